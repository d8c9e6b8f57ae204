//! Freedesktop icon-theme lookup.
//!
//! Search order for a name at a pixel size:
//!
//! 1. the name itself, when it is an absolute path to an existing file
//! 2. the item's own theme path (flat files, then theme layout)
//! 3. the configured theme, then `hicolor`, in every XDG data dir:
//!    `<size>x<size>/<context>` before `scalable/<context>`
//! 4. `/usr/share/pixmaps`

use panel_core::host::IconThemeResolver;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXTENSIONS: [&str; 2] = ["png", "svg"];
const CONTEXTS: [&str; 5] = ["status", "apps", "devices", "panel", "actions"];
const FALLBACK_THEME: &str = "hicolor";

#[derive(Debug, Clone)]
pub struct ThemeIconResolver {
    themes:    Vec<String>,
    /// Directories that contain icon themes, most specific first.
    icon_dirs: Vec<PathBuf>,
    pixmaps:   PathBuf,
}

impl ThemeIconResolver {
    /// Resolver over the user's XDG data directories.
    pub fn new(theme: &str) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);

        let data_home = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|h| h.join(".local/share")));
        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());

        let mut icon_dirs: Vec<PathBuf> = home.iter().map(|h| h.join(".icons")).collect();
        icon_dirs.extend(data_home.map(|d| d.join("icons")));
        icon_dirs.extend(data_dirs.split(':').map(|d| Path::new(d).join("icons")));

        Self::with_dirs(theme, icon_dirs, PathBuf::from("/usr/share/pixmaps"))
    }

    pub fn with_dirs(theme: &str, icon_dirs: Vec<PathBuf>, pixmaps: PathBuf) -> Self {
        let mut themes = vec![theme.to_string()];
        if theme != FALLBACK_THEME {
            themes.push(FALLBACK_THEME.to_string());
        }
        Self { themes, icon_dirs, pixmaps }
    }

    fn in_theme(&self, base: &Path, theme: &str, name: &str, size: u32) -> Option<PathBuf> {
        let root = base.join(theme);
        let sized = format!("{size}x{size}");
        let found = [sized.as_str(), "scalable"].into_iter().find_map(|dir| {
            CONTEXTS
                .iter()
                .find_map(|ctx| with_extension(&root.join(dir).join(ctx), name))
        });
        found
    }
}

/// `dir/name.png` or `dir/name.svg`, whichever exists first.
fn with_extension(dir: &Path, name: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
}

fn is_svg(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

impl IconThemeResolver for ThemeIconResolver {
    fn resolve(&self, name: &str, size: u32, extra_search_path: Option<&Path>) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }

        let from_extra = extra_search_path.and_then(|extra| {
            with_extension(extra, name).or_else(|| {
                self.themes
                    .iter()
                    .find_map(|theme| self.in_theme(extra, theme, name, size))
            })
        });

        let found = from_extra
            .or_else(|| {
                self.themes.iter().find_map(|theme| {
                    self.icon_dirs
                        .iter()
                        .find_map(|base| self.in_theme(base, theme, name, size))
                })
            })
            .or_else(|| with_extension(&self.pixmaps, name));

        if found.is_none() {
            debug!("icon '{name}' not found at {size}px in {:?}", self.themes);
        }
        found
    }

    /// PNGs keep their aspect ratio when scaled to `size` tall; SVGs are
    /// treated as square.
    fn icon_width(&self, path: &Path, size: u32) -> u32 {
        if is_svg(path) {
            return size;
        }
        match image::image_dimensions(path) {
            Ok((w, h)) if h > 0 => ((w as f64 * size as f64) / h as f64).round() as u32,
            Ok(_) => size,
            Err(e) => {
                warn!("cannot read dimensions of {}: {e}", path.display());
                size
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self { dir: tempfile::tempdir().unwrap() }
        }

        fn icons(&self) -> PathBuf {
            self.dir.path().join("icons")
        }

        fn pixmaps(&self) -> PathBuf {
            self.dir.path().join("pixmaps")
        }

        fn touch(&self, rel: &str) -> PathBuf {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"<svg/>").unwrap();
            path
        }

        fn png(&self, rel: &str, w: u32, h: u32) -> PathBuf {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            image::RgbaImage::new(w, h).save(&path).unwrap();
            path
        }

        fn resolver(&self, theme: &str) -> ThemeIconResolver {
            ThemeIconResolver::with_dirs(theme, vec![self.icons()], self.pixmaps())
        }
    }

    #[test]
    fn configured_theme_wins_over_hicolor() {
        let fx = Fixture::new();
        fx.touch("icons/hicolor/24x24/apps/mail.svg");
        let themed = fx.touch("icons/Papirus/24x24/apps/mail.svg");
        assert_eq!(fx.resolver("Papirus").resolve("mail", 24, None), Some(themed));
    }

    #[test]
    fn sized_directory_before_scalable() {
        let fx = Fixture::new();
        fx.touch("icons/hicolor/scalable/status/nm.svg");
        let sized = fx.png("icons/hicolor/22x22/status/nm.png", 22, 22);
        let resolver = fx.resolver("hicolor");
        assert_eq!(resolver.resolve("nm", 22, None), Some(sized));
        assert!(resolver.resolve("nm", 48, None).unwrap().ends_with("scalable/status/nm.svg"));
    }

    #[test]
    fn item_theme_path_is_searched_first() {
        let fx = Fixture::new();
        fx.touch("icons/hicolor/24x24/apps/steam.svg");
        let own = fx.touch("steam-icons/steam.svg");
        let extra = fx.dir.path().join("steam-icons");
        assert_eq!(fx.resolver("hicolor").resolve("steam", 24, Some(&extra)), Some(own));
    }

    #[test]
    fn pixmaps_and_absolute_paths() {
        let fx = Fixture::new();
        let pixmap = fx.touch("pixmaps/legacy.png");
        let resolver = fx.resolver("hicolor");
        assert_eq!(resolver.resolve("legacy", 24, None), Some(pixmap.clone()));
        assert_eq!(resolver.resolve(pixmap.to_str().unwrap(), 24, None), Some(pixmap));
        assert_eq!(resolver.resolve("/nonexistent/icon.png", 24, None), None);
    }

    #[test]
    fn missing_icon_resolves_to_none() {
        let fx = Fixture::new();
        assert_eq!(fx.resolver("hicolor").resolve("nothing", 24, None), None);
    }

    #[test]
    fn png_width_keeps_aspect_ratio() {
        let fx = Fixture::new();
        let wide = fx.png("wide.png", 96, 48);
        let svg = fx.touch("square.svg");
        let resolver = fx.resolver("hicolor");
        assert_eq!(resolver.icon_width(&wide, 24), 48);
        assert_eq!(resolver.icon_width(&svg, 24), 24);
        assert_eq!(resolver.icon_width(Path::new("/nonexistent.png"), 24), 24);
    }
}
