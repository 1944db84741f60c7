mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{
    ENV_AUTO_REGISTER_ENVIRONMENT, ENV_AUTO_REGISTER_KEY, ENV_AUTO_REGISTER_TIMEOUT,
    ENV_SERVER_URL, LABEL_ENVIRONMENT, LABEL_MANAGED, LABEL_MANAGED_VALUE, LABEL_REQUEST_KEY,
    PROP_ENVIRONMENT, PROP_IMAGE,
};
