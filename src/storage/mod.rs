pub mod errors;
pub mod ledger;
pub mod sheet;
pub mod types;

pub use errors::StorageError;
pub use ledger::{RecordStore, SharedLedger, SheetLedger};
pub use types::{AttendanceRecord, AttendanceStatus, Session, SessionId};
