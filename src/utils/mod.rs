pub mod debounce;
pub mod input_field;
pub mod path;
pub mod validation;

pub use debounce::Debouncer;
pub use input_field::InputField;
pub use path::{
    get_config_dir, get_config_path, get_home_dir, get_log_dir, get_token_path,
    write_private_file,
};
