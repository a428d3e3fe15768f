use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("settings error: {0}")]
    Settings(#[from] snap_settings::SettingsError),

    #[error("serialization error: {0}")]
    Driver(#[from] snap_driver::DriverError),

    #[error("value name given more than once: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    Verify(#[from] snap_verify::VerifyError),
}

impl SdkError {
    /// Returns `true` if the verifier rejected the received text.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            SdkError::Verify(snap_verify::VerifyError::Mismatch { .. })
                | SdkError::Driver(snap_driver::DriverError::Verify(
                    snap_verify::VerifyError::Mismatch { .. }
                ))
        )
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
