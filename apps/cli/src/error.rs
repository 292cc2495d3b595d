pub type Result<T> = color_eyre::Result<T>;
