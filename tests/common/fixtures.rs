//! Test fixtures - a small site that passes release validation.

use std::fs;
use std::path::Path;

/// `deploy.toml` with a single local environment at `./deploy`
pub const LOCAL_CONFIG: &str = r#"[build]
command = []
output_dir = "public"

[[environments]]
name = "local"
path = "./deploy"
keep_n = 2
"#;

pub const INDEX_HTML: &str = "<!doctype html><h1>Hello</h1>\n";
pub const SERVICE_WORKER: &str = "self.addEventListener('fetch', () => {});\n";
pub const STYLESHEET: &str = "body { margin: 0 }\n";

/// Health payload carrying the release ID
pub fn healthz(release_id: &str) -> String {
    format!("{{\"status\":\"ok\",\"release\":\"{}\"}}\n", release_id)
}

/// Write a complete site for `release_id` into `dir`
pub fn write_site(dir: &Path, release_id: &str) {
    fs::create_dir_all(dir.join("css")).unwrap();
    fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
    fs::write(dir.join("sw.js"), SERVICE_WORKER).unwrap();
    fs::write(dir.join("css/site.css"), STYLESHEET).unwrap();
    fs::write(dir.join("healthz.json"), healthz(release_id)).unwrap();
}

/// Collect files under `dir` as sorted `/`-separated relative paths
pub fn list_files(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap().flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(dir, dir, &mut files);
    files.sort();
    files
}
