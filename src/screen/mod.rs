//! Full-page views and the modal overlays that sit on top of them.

mod home;
mod nearby;
mod queue_form;
mod service_picker;

pub use home::{HomeEvent, HomeScreen};
pub use nearby::{NearbyEvent, NearbyScreen};
pub use queue_form::{QueueForm, QueueFormEvent};
pub use service_picker::{ServicePicker, ServicePickerEvent};
