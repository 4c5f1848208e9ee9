//! Form and multipart field values shared by endpoint bindings and media uploads.

// self
use crate::_prelude::*;

/// One form or multipart field. Values are immutable once constructed.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpParameter {
	/// Plain name/value pair.
	Text {
		/// Field name.
		name: String,
		/// Field value.
		value: String,
	},
	/// File read from disk when the request is dispatched.
	File {
		/// Field name.
		name: String,
		/// Path of the file to attach.
		path: PathBuf,
	},
	/// In-memory payload attached under a file name.
	Stream {
		/// Field name.
		name: String,
		/// File name announced in the multipart part.
		file_name: String,
		/// Raw payload.
		bytes: Arc<[u8]>,
	},
}
impl HttpParameter {
	/// Creates a name/value field.
	pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Text { name: name.into(), value: value.into() }
	}

	/// Creates a file field.
	pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self::File { name: name.into(), path: path.into() }
	}

	/// Creates an in-memory file field.
	pub fn stream(
		name: impl Into<String>,
		file_name: impl Into<String>,
		bytes: impl Into<Arc<[u8]>>,
	) -> Self {
		Self::Stream { name: name.into(), file_name: file_name.into(), bytes: bytes.into() }
	}

	/// Field name.
	pub fn name(&self) -> &str {
		match self {
			Self::Text { name, .. } | Self::File { name, .. } | Self::Stream { name, .. } => name,
		}
	}

	/// Text value, or `None` for file-carrying fields.
	pub fn value(&self) -> Option<&str> {
		match self {
			Self::Text { value, .. } => Some(value),
			_ => None,
		}
	}

	/// Returns `true` when the field carries a file payload and forces a multipart body.
	pub fn is_file(&self) -> bool {
		!matches!(self, Self::Text { .. })
	}

	/// File name announced for file-carrying fields.
	pub fn file_name(&self) -> Option<&str> {
		match self {
			Self::Text { .. } => None,
			Self::File { path, .. } => path.file_name().and_then(|name| name.to_str()),
			Self::Stream { file_name, .. } => Some(file_name),
		}
	}

	/// Guesses the part content type from the file extension.
	pub fn content_type(&self) -> &'static str {
		let Some(file_name) = self.file_name() else {
			return "text/plain";
		};
		let extension = Path::new(file_name)
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| ext.to_ascii_lowercase());

		match extension.as_deref() {
			Some("gif") => "image/gif",
			Some("png") => "image/png",
			Some("jpg" | "jpeg") => "image/jpeg",
			_ => "application/octet-stream",
		}
	}

	/// Returns the same payload under a different field name.
	pub fn renamed(self, name: impl Into<String>) -> Self {
		let name = name.into();

		match self {
			Self::Text { value, .. } => Self::Text { name, value },
			Self::File { path, .. } => Self::File { name, path },
			Self::Stream { file_name, bytes, .. } => Self::Stream { name, file_name, bytes },
		}
	}
}
impl Debug for HttpParameter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text { name, value } =>
				f.debug_struct("Text").field("name", name).field("value", value).finish(),
			Self::File { name, path } =>
				f.debug_struct("File").field("name", name).field("path", path).finish(),
			Self::Stream { name, file_name, bytes } => f
				.debug_struct("Stream")
				.field("name", name)
				.field("file_name", file_name)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// Concatenates two parameter lists, `src` first, preserving the order of both.
pub fn append_parameters(src: &[HttpParameter], dst: &[HttpParameter]) -> Vec<HttpParameter> {
	let mut merged = Vec::with_capacity(src.len() + dst.len());

	merged.extend_from_slice(src);
	merged.extend_from_slice(dst);

	merged
}

/// Returns `true` when any field requires a multipart body.
pub fn contains_file(params: &[HttpParameter]) -> bool {
	params.iter().any(HttpParameter::is_file)
}
