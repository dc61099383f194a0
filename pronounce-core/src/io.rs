use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::io as stdio;

use tempfile::NamedTempFile;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Invalid UTF-8 sequences are replaced rather than rejected
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> stdio::Result<Vec<String>> {
	let mut bytes = Vec::new();
	File::open(filename)?.read_to_end(&mut bytes)?;
	Ok(String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/cmudict.dict` + `"bin"` → `data/cmudict.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> stdio::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| stdio::Error::new(stdio::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Writes `bytes` to `path` atomically.
///
/// - Creates missing parent directories
/// - Writes into a temporary file next to the target, then renames it over
///   the target so readers never observe a partial file
pub(crate) fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> stdio::Result<()> {
	let path = path.as_ref();
	let parent_dir = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	fs::create_dir_all(parent_dir)?;

	let mut temp_file = NamedTempFile::new_in(parent_dir)?;
	temp_file.write_all(bytes)?;
	temp_file.flush()?;
	temp_file.persist(path).map_err(|e| e.error)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_swaps_extension() {
		let out = build_output_path("data/cmudict.dict", "bin").unwrap();
		assert_eq!(out, PathBuf::from("data/cmudict.bin"));
	}

	#[test]
	fn atomic_write_creates_parents() {
		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("nested").join("deeper").join("blob.bin");
		write_atomic(&target, b"abc").unwrap();
		assert_eq!(fs::read(&target).unwrap(), b"abc");

		write_atomic(&target, b"xyz").unwrap();
		assert_eq!(fs::read(&target).unwrap(), b"xyz");
	}

	#[test]
	fn read_lines_splits_and_tolerates_bad_utf8() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lex.txt");
		fs::write(&path, b"cat K AE1 T\r\ndog D AO1 G\n\xff\n").unwrap();
		let lines = read_lines(&path).unwrap();
		assert_eq!(lines.len(), 3);
		assert_eq!(lines[0], "cat K AE1 T");
		assert_eq!(lines[1], "dog D AO1 G");
	}
}
