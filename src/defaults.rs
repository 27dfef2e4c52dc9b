use include_dir::{include_dir, Dir, DirEntry};
use std::fs;
use std::path::Path;

static BUNDLED: Dir = include_dir!("$CARGO_MANIFEST_DIR/config");

/// Seed the user config directory with the bundled defaults. Files the
/// user already has are left alone.
pub fn ensure_config() {
	if let Some(base) = dirs::config_dir() {
		unpack(&BUNDLED, &base.join("set-rush"));
	}
}

fn unpack(dir: &Dir, dest: &Path) {
	for entry in dir.entries() {
		match entry {
			DirEntry::Dir(sub) => unpack(sub, dest),
			DirEntry::File(file) => {
				let target = dest.join(file.path());
				if target.exists() {
					continue;
				}
				if let Some(parent) = target.parent() {
					let _ = fs::create_dir_all(parent);
				}
				let _ = fs::write(&target, file.contents());
			}
		}
	}
}
