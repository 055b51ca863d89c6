//! Shell scripts executed on the target host.
//!
//! Every path is single-quoted with [`shell_quote`]. Scripts signal expected
//! outcomes through dedicated exit codes so the caller can tell them apart
//! from transport failures.

use std::path::Path;

use super::shell::shell_quote;
use crate::domain::value_objects::{ReleaseId, ReleaseLayout, REQUIRED_FILES};

/// No manifest behind `current`
pub const EXIT_NOT_FOUND: i32 = 3;
/// Release directory already exists
pub const EXIT_EXISTS: i32 = 4;
/// Marker file missing; its name is printed on stdout
pub const EXIT_INVALID: i32 = 5;
/// Release directory does not exist
pub const EXIT_NO_RELEASE: i32 = 6;

fn q(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

pub fn fetch_manifest(layout: &ReleaseLayout) -> String {
    format!(
        "f={manifest}\n\
         [ -f \"$f\" ] || exit {EXIT_NOT_FOUND}\n\
         cat \"$f\"\n",
        manifest = q(&layout.current_manifest()),
    )
}

/// Hardlink-clone the resolved `current` target, or start empty
pub fn create_release(layout: &ReleaseLayout, id: &ReleaseId) -> String {
    format!(
        "set -e\n\
         r={release}\n\
         c={current}\n\
         if [ -e \"$r\" ]; then exit {EXIT_EXISTS}; fi\n\
         mkdir -p {releases}\n\
         if [ -L \"$c\" ] && [ -d \"$c\" ]; then\n\
         \x20 cp -al \"$(readlink -f \"$c\")\" \"$r\"\n\
         else\n\
         \x20 mkdir \"$r\"\n\
         fi\n",
        release = q(&layout.release_dir(id)),
        current = q(&layout.current_link()),
        releases = q(&layout.releases_dir()),
    )
}

/// Create the staging link and rename it over `current`
fn swap(layout: &ReleaseLayout, id: &ReleaseId) -> String {
    let staging = q(&layout.staging_link());
    format!(
        "rm -f {staging}\n\
         ln -s {target} {staging}\n\
         mv -Tf {staging} {current}\n",
        target = q(&layout.relative_release(id)),
        current = q(&layout.current_link()),
    )
}

/// Validate marker files (removing the release on failure), then swap
pub fn activate(layout: &ReleaseLayout, id: &ReleaseId) -> String {
    format!(
        "set -e\n\
         r={release}\n\
         [ -d \"$r\" ] || exit {EXIT_NO_RELEASE}\n\
         for f in {markers}; do\n\
         \x20 if [ ! -f \"$r/$f\" ]; then\n\
         \x20   rm -rf \"$r\"\n\
         \x20   echo \"$f\"\n\
         \x20   exit {EXIT_INVALID}\n\
         \x20 fi\n\
         done\n\
         {swap}",
        release = q(&layout.release_dir(id)),
        markers = REQUIRED_FILES.join(" "),
        swap = swap(layout, id),
    )
}

/// Swap without validation
pub fn rollback(layout: &ReleaseLayout, id: &ReleaseId) -> String {
    format!(
        "set -e\n\
         [ -d {release} ] || exit {EXIT_NO_RELEASE}\n\
         {swap}",
        release = q(&layout.release_dir(id)),
        swap = swap(layout, id),
    )
}

/// One `name mtime is_current` line per release directory
pub fn list_releases(layout: &ReleaseLayout) -> String {
    format!(
        "current=$(readlink -f {current} 2>/dev/null || true)\n\
         cd {releases} 2>/dev/null || exit 0\n\
         root=$(pwd -P)\n\
         for d in */; do\n\
         \x20 d=\"${{d%/}}\"\n\
         \x20 [ -d \"$d\" ] || continue\n\
         \x20 m=$(stat -c %Y \"$d\" 2>/dev/null || echo 0)\n\
         \x20 c=false\n\
         \x20 [ \"$root/$d\" = \"$current\" ] && c=true\n\
         \x20 echo \"$d $m $c\"\n\
         done\n",
        current = q(&layout.current_link()),
        releases = q(&layout.releases_dir()),
    )
}

pub fn remove_releases<'a>(paths: impl IntoIterator<Item = &'a Path>) -> String {
    let quoted: Vec<String> = paths.into_iter().map(q).collect();
    format!("set -e\nrm -rf -- {}\n", quoted.join(" "))
}

pub fn current_release(layout: &ReleaseLayout) -> String {
    format!(
        "c={current}\n\
         [ -L \"$c\" ] || exit 0\n\
         t=$(readlink -f \"$c\" 2>/dev/null || true)\n\
         if [ -n \"$t\" ] && [ -d \"$t\" ]; then basename \"$t\"; fi\n",
        current = q(&layout.current_link()),
    )
}

/// Fetch the health payload over HTTP on the host, or read it through
/// `current` when no URL is configured
pub fn health_payload(layout: &ReleaseLayout, health_url: Option<&str>) -> String {
    match health_url {
        Some(url) => format!("curl -sf {}\n", shell_quote(url)),
        None => format!("cat {}\n", q(&layout.current_health_file())),
    }
}

/// Command that unpacks the upload stream into the release.
///
/// `--unlink-first` removes each existing entry before writing it, breaking
/// the hardlink shared with the previous release.
pub fn extract(layout: &ReleaseLayout, id: &ReleaseId) -> String {
    format!(
        "cd {} && gzip -dc | tar --extract --unlink-first --preserve-permissions --file -",
        q(&layout.release_dir(id)),
    )
}
