//! Request dispatch, the wire contract and the typed operation catalogue

pub mod dispatcher;
pub mod endpoints;
pub mod envelope;
pub mod operations;
pub mod redirect;
pub mod result;
pub mod transport;

pub use dispatcher::{Dispatcher, Transport};
pub use envelope::{codes, Envelope, GENERIC_SERVER_MESSAGE};
pub use operations::{
    ChatMessage, ChatSession, ExportTicket, LoginResponse, Page, PageQuery, Reference, SearchQuery,
    SendMessageReply,
};
pub use redirect::{AuthRedirect, RedirectEvent};
pub use result::{ApiError, ApiResponse, ApiResult, ErrorKind, Outcome};
pub use transport::{FilePart, LiveTransport, MultipartPayload, Payload, RequestOptions};
