pub mod runtime;

pub use runtime::java_package_name;
pub use runtime::required_java_for_minecraft_version;
pub use runtime::LATEST_JAVA_MAJOR;
pub use runtime::LEGACY_JAVA_MAJOR;
