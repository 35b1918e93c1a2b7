//! Storage and email backends.

pub mod document_store {
    pub use crate::document_store::*;
}

pub mod db_storage {
    pub use crate::db_storage::*;
}

pub mod email_client {
    pub use crate::email_client::*;
}

pub mod notifier {
    pub use crate::notifier::*;
}
