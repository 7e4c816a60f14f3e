mod chat;
mod dashboard;
mod upload;

pub use chat::ChatView;
pub use dashboard::DashboardView;
pub use upload::UploadView;
