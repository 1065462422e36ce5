mod kube;
mod logs;

pub use kube::RestartPodTool;
pub use logs::{ListLogFilesTool, ReadLogFileTool, SearchLogsTool};
