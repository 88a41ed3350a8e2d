//! Front-end state: list, form and session controllers.
//!
//! Controllers own their state exclusively and talk to the backends through
//! the traits defined here ([`ListSource`], [`RecordStore`], [`AuthBackend`]),
//! so the CLI, the terminal browser and the tests can drive them alike.

pub mod filters;
pub mod form;
pub mod list;
pub mod notice;
pub mod route;
pub mod session;

pub use filters::{BookingFilter, BookingFilterPatch, StatusFilter, TaskFilter, TaskFilterPatch};
pub use form::{
    BookingSchema, FieldError, FieldErrors, FieldKind, FieldSpec, FormController, FormSchema,
    RecordStore, SubmitError, Submitted, TaskSchema,
};
pub use list::{FetchTicket, Filter, ListController, ListSource, Page, PageQuery, Sort, SortOrder};
pub use notice::{Notice, NoticeLevel, Notices};
pub use route::Route;
pub use session::{
    Access, AuthBackend, AuthFailure, AuthGrant, AuthSession, FileTokenStore, MemoryTokenStore,
    SharedToken, TokenStore,
};
