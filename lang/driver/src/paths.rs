use std::path::{Path, PathBuf};

/// Appended to the stem of the input file to name the generated program.
pub const GENERATED_SUFFIX: &str = "_generated.codon";

/// `app.py` -> `app_generated.codon`, next to the input.
pub fn generated_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    input.with_file_name(format!("{stem}{GENERATED_SUFFIX}"))
}

/// `app.py` -> `app`, next to the input. An input without extension gets `.bin`.
pub fn default_binary_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(_) => input.with_extension(""),
        None => input.with_extension("bin"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{default_binary_path, generated_path};

    #[test]
    fn sibling_paths() {
        assert_eq!(generated_path(Path::new("demos/hello.py")), PathBuf::from("demos/hello_generated.codon"));
        assert_eq!(default_binary_path(Path::new("demos/hello.py")), PathBuf::from("demos/hello"));
        assert_eq!(default_binary_path(Path::new("server")), PathBuf::from("server.bin"));
    }
}
