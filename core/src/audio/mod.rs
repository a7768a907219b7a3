//! Audio backend configuration
//!
//! Leaves first: the registry knows which backends exist, the enumerator
//! lists their devices, the form ties both to one editable
//! [`ConfigurationState`].

mod chooser;
mod devices;
mod form;
mod native;
mod registry;
mod state;

pub use chooser::{FileChooser, WAV_FILE_DIALOG_TITLE};
pub use devices::{
    DEFAULT_ENUMERATION_TIMEOUT, DeviceEnumerator, EnumerationError, NativeEnumerator,
};
pub use form::{ConfigForm, FORM_TITLE, FieldView, FormError, FormView};
pub use registry::{BackendDescriptor, BackendRegistry, ListDevicesFn, RegistryError};
pub use state::ConfigurationState;
