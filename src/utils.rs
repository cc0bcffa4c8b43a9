use std::fs;
use std::path::Path;

// Some pretty printing codepoints
pub const SKIP_C: &str = "⏭";
pub const CHECK_C: &str = "✓";

fn get_file_size_in_kb(path: &Path) -> std::io::Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / 1024.0)
}

fn pretty_msg_at_path(msg: &str, path: &Path) -> String {
    let at = "\x1b[1;36m@\x1b[0m"; // bold + cyan
    match get_file_size_in_kb(path) {
        Ok(size_kb) => {
            let size_str = format!("\x1b[1m{size_kb:.2} KB\x1b[0m"); // bold
            format!("{msg} {at} {} ({})", path.display(), size_str)
        }
        Err(..) => format!("{msg} {at} {}", path.display()),
    }
}

/// Printed to stderr: stdout may be carrying markup.
pub fn pretty_println_at_path(msg: &str, path: &Path) {
    eprintln!("{}", pretty_msg_at_path(msg, path));
}

pub fn skip_because_file_exists(skipped: &str, path: &Path) {
    let msg = format!("{SKIP_C} Skipping {skipped}: file already exists");
    pretty_println_at_path(&msg, path);
}
