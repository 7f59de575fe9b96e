pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid {field}: {message}")]
	InvalidInput { field: String, message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Directory error: {message}")]
	Directory { message: String },
}
impl From<sac_storage::Error> for Error {
	fn from(err: sac_storage::Error) -> Self {
		match err {
			sac_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sac_storage::Error::InvalidArgument(message) => Self::Storage { message },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Directory { message: err.to_string() }
	}
}
