//! Assistant backend data model

pub mod chat;
pub mod device;
pub mod settings;
pub mod special;

pub use chat::{ChatReply, ChatRequest, ChatTextError, Operation, OperationDetails};
pub use device::{Device, DeviceType, InvalidDeviceTypeError, NewDevice};
pub use settings::{AssistantState, Settings, SettingsUpdate};
pub use special::{CommandSequence, ServiceWord, SpecialCommandError};
