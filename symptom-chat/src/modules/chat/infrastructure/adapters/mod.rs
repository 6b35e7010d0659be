// Symptom Service Adapters
// - HttpSymptomService: 通过 HTTP 访问远端服务
// - OfflineSymptomService: 本地替身，行为与未接入 LLM 的服务端一致

mod http;
mod offline;

pub use http::*;
pub use offline::*;
