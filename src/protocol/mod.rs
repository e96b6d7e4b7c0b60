mod body;
mod head;

pub use body::VecBody;
pub use head::{http_version, FieldList, RequestHead, ResponseHead};
