use std::io::{self, Write as _};
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom as _;
use tempfile::NamedTempFile;

const LENGTH: usize = 64;
const NUM_DIGITS: usize = 10;
const NUM_SYMBOLS: usize = 10;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = br#"~!@#$%^&*()_+`-={}|[]\:"<>?,./"#;

/// A keystore password of [`LENGTH`] distinct characters, exactly
/// [`NUM_DIGITS`] of them digits and [`NUM_SYMBOLS`] symbols.
pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut password: Vec<u8> = Vec::with_capacity(LENGTH);
    password.extend(DIGITS.choose_multiple(rng, NUM_DIGITS));
    password.extend(SYMBOLS.choose_multiple(rng, NUM_SYMBOLS));
    password.extend(LETTERS.choose_multiple(rng, LENGTH - NUM_DIGITS - NUM_SYMBOLS));
    password.shuffle(rng);
    password.into_iter().map(char::from).collect()
}

/// Store `password` in a fresh owner-only file under `dir`.
///
/// The file is removed when the returned handle is dropped.
pub(crate) fn write_to(dir: &Path, password: &str) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("password")
        .tempfile_in(dir)?;
    file.write_all(password.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::os::unix::fs::PermissionsExt as _;

    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    fn count(password: &str, class: &[u8]) -> usize {
        password.bytes().filter(|b| class.contains(b)).count()
    }

    #[test]
    fn composition() {
        for seed in 0..32 {
            let password = generate(&mut StdRng::seed_from_u64(seed));
            assert_eq!(password.len(), LENGTH);
            assert_eq!(count(&password, DIGITS), NUM_DIGITS);
            assert_eq!(count(&password, SYMBOLS), NUM_SYMBOLS);
            assert_eq!(count(&password, LETTERS), LENGTH - NUM_DIGITS - NUM_SYMBOLS);
        }
    }

    #[test]
    fn no_repeated_characters() {
        let password = generate(&mut StdRng::seed_from_u64(7));
        let unique = password.chars().collect::<HashSet<_>>();
        assert_eq!(unique.len(), LENGTH);
    }

    #[test]
    fn seeds_differ() {
        let a = generate(&mut StdRng::seed_from_u64(1));
        let b = generate(&mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }

    #[test]
    fn written_owner_only_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_to(dir.path(), "hunter2").unwrap();
        let path = file.path().to_path_buf();

        assert!(path.starts_with(dir.path()));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("password")
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "hunter2");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        drop(file);
        assert!(!path.exists());
    }
}
