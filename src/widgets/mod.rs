// Reusable UI widgets

pub mod toast;

pub use toast::ToastWidget;
