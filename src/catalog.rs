use std::fs;
use std::path::{Path, PathBuf};
use anyhow;
use rand::seq::SliceRandom;
use rand::Rng;
use super::file_reader::*;
use super::font::Font;
use super::font_builder::TrailingBlock;

/// Extension a file needs to be picked up from a font directory.
pub const FONT_EXTENSION: &str = "flf";

fn is_font_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));
    let font_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(FONT_EXTENSION));
    !hidden && font_extension && path.is_file()
}

pub fn load_font<P: AsRef<Path>>(path: P, policy: TrailingBlock) -> anyhow::Result<Font> {
    Font::from_contents(open_figlet(path)?, policy)
}

/// Loads every font in `dir`, sorted by path. Files that fail to parse are skipped.
pub fn load_dir<P: AsRef<Path>>(dir: P, policy: TrailingBlock) -> anyhow::Result<Vec<(PathBuf, Font)>> {
    let dir = dir.as_ref();
    let not_found = |source| FigletError::ResourceNotFound {
        name: dir.display().to_string(),
        source,
    };
    let mut paths = vec![];
    for entry in fs::read_dir(dir).map_err(not_found)? {
        let path = entry.map_err(not_found)?.path();
        if is_font_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut fonts = Vec::with_capacity(paths.len());
    for path in paths {
        match load_font(&path, policy) {
            Ok(font) => fonts.push((path, font)),
            Err(err) => tracing::warn!("skipping {}: {:#}", path.display(), err),
        }
    }
    tracing::debug!("loaded {} fonts from {}", fonts.len(), dir.display());
    Ok(fonts)
}

pub fn random_font<P: AsRef<Path>, R: Rng + ?Sized>(
    dir: P,
    policy: TrailingBlock,
    rng: &mut R,
) -> anyhow::Result<Option<(PathBuf, Font)>> {
    let fonts = load_dir(dir, policy)?;
    Ok(fonts.choose(rng).cloned())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::*;

    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> anyhow::Result<Scratch> {
            let dir = env::temp_dir().join(format!("figfont-{}-{}", name, process::id()));
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
            }
            fs::create_dir_all(&dir)?;
            Ok(Scratch(dir))
        }

        fn write(&self, name: &str, text: &str) -> anyhow::Result<()> {
            fs::write(self.0.join(name), text)?;
            Ok(())
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    const SMALL: &str = "flf2a$ 1 1 3 -1 0\n$a@@\n";
    const TALL: &str = "flf2a# 2 1 3 -1 1\ntall\nb#@\nb#@@\n";

    #[test]
    fn can_load_font() -> anyhow::Result<()> {
        let scratch = Scratch::new("load-font")?;
        scratch.write("small.flf", SMALL)?;
        let font = load_font(scratch.0.join("small.flf"), TrailingBlock::Discard)?;
        assert_eq!(font.glyph(' ').unwrap().lines(), [" a"]);
        assert_eq!(font.file_contents().map(|c| c.header.hard_blank), Some('$'));
        Ok(())
    }

    #[test]
    fn can_load_dir() -> anyhow::Result<()> {
        let scratch = Scratch::new("load-dir")?;
        scratch.write("tall.FLF", TALL)?;
        scratch.write("small.flf", SMALL)?;
        scratch.write("broken.flf", "not a font\n")?;
        scratch.write(".hidden.flf", SMALL)?;
        scratch.write("readme.txt", SMALL)?;
        fs::create_dir(scratch.0.join("nested.flf"))?;

        let fonts = load_dir(&scratch.0, TrailingBlock::Discard)?;
        let names: Vec<_> = fonts
            .iter()
            .map(|(path, _)| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["small.flf", "tall.FLF"]);
        assert_eq!(fonts[1].1.height(), 2);
        Ok(())
    }

    #[test]
    fn load_dir_applies_policy() -> anyhow::Result<()> {
        let scratch = Scratch::new("policy")?;
        scratch.write("partial.flf", "flf2a$ 2 1 3 -1 0\na@\na@@\nb@\n")?;
        assert_eq!(load_dir(&scratch.0, TrailingBlock::Discard)?.len(), 1);
        assert!(load_dir(&scratch.0, TrailingBlock::Reject)?.is_empty());
        Ok(())
    }

    #[test]
    fn reports_missing_dir() {
        let err = load_dir("/definitely/not/a/font/dir", TrailingBlock::Discard).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FigletError>(),
            Some(FigletError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn can_pick_random_font() -> anyhow::Result<()> {
        let scratch = Scratch::new("random")?;
        scratch.write("small.flf", SMALL)?;
        scratch.write("tall.flf", TALL)?;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..8 {
            let (path, font) = random_font(&scratch.0, TrailingBlock::Discard, &mut rng)?.unwrap();
            assert!(path.starts_with(&scratch.0));
            assert!(!font.is_empty());
        }
        Ok(())
    }

    #[test]
    fn random_font_in_empty_dir_is_none() -> anyhow::Result<()> {
        let scratch = Scratch::new("empty")?;
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_font(&scratch.0, TrailingBlock::Discard, &mut rng)?.is_none());
        Ok(())
    }
}
