pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod store;
pub mod view;

pub use api::{
  ApiClient,
  ApiRequest,
  Method,
  RawResponse,
  TaskApi,
  Transport
};
pub use controller::{
  Command,
  Controller,
  ControllerSettings,
  Snapshot
};
pub use error::{
  ClientError,
  RequestError,
  ValidationError
};
pub use filter::Filter;
pub use store::TaskStore;
pub use tasklist_shared::{
  Task,
  TaskId,
  ToggleResult
};
