// SPDX-License-Identifier: Mulan PSL v2
/*
 * Copyright (c) 2024 Huawei Technologies Co., Ltd.
 * symupload-common is licensed under Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *         http://license.coscl.org.cn/MulanPSL2
 *
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND,
 * EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT,
 * MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use std::{
    ffi::OsStr,
    fs::{File, FileType, OpenOptions, ReadDir},
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::debug;

trait RewriteError {
    fn rewrite_err(self, err_msg: String) -> Self;
}

impl<T> RewriteError for io::Result<T> {
    #[inline]
    fn rewrite_err(self, err_msg: String) -> Self {
        self.map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("{}, {}", err_msg, e.to_string().to_lowercase()),
            )
        })
    }
}

/* std::fs functions */
#[inline]
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    std::fs::read_to_string(&path)
        .rewrite_err(format!("Cannot read file {}", path.as_ref().display()))
}

#[inline]
pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    std::fs::write(&path, contents)
        .rewrite_err(format!("Cannot write file {}", path.as_ref().display()))
}

#[inline]
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> io::Result<u64> {
    std::fs::copy(&from, &to).rewrite_err(format!(
        "Cannot copy {} to {}",
        from.as_ref().display(),
        to.as_ref().display()
    ))
}

#[inline]
pub fn create_dir_all<P: AsRef<Path>>(path: P) -> io::Result<()> {
    std::fs::create_dir_all(&path).rewrite_err(format!(
        "Cannot create directory {}",
        path.as_ref().display(),
    ))
}

#[inline]
pub fn read_dir<P: AsRef<Path>>(path: P) -> io::Result<ReadDir> {
    std::fs::read_dir(&path)
        .rewrite_err(format!("Cannot read directory {}", path.as_ref().display()))
}

/* Extended functions */
pub fn open_file<P: AsRef<Path>>(path: P) -> io::Result<File> {
    File::open(&path).rewrite_err(format!("Cannot open file {}", path.as_ref().display()))
}

/// Appends `contents` to an existing file, never creating it.
pub fn append<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let file_path = path.as_ref();
    let mut file = OpenOptions::new()
        .append(true)
        .open(file_path)
        .rewrite_err(format!("Cannot open file {}", file_path.display()))?;

    file.write_all(contents.as_ref())
        .and_then(|_| file.flush())
        .rewrite_err(format!("Cannot write file {}", file_path.display()))
}

#[derive(Clone, Copy)]
pub struct TraverseOptions {
    pub recursive: bool,
}

pub fn traverse<P, F>(
    directory: P,
    options: TraverseOptions,
    predicate: F,
) -> io::Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    F: Fn(&FileType, &Path) -> bool + Copy,
{
    let mut results = Vec::new();
    let mut subdirs = Vec::new();

    for dir_entry in read_dir(directory)?.flatten() {
        let file_type = dir_entry.file_type()?;
        let file_path = dir_entry.path();

        if predicate(&file_type, &file_path) {
            results.push(file_path.clone());
        }
        if options.recursive && file_type.is_dir() {
            subdirs.push(file_path);
        }
    }

    for subdir in subdirs {
        results.extend(traverse(subdir, options, predicate)?);
    }

    Ok(results)
}

pub fn list_files_by_ext<P, S>(
    directory: P,
    ext: S,
    options: TraverseOptions,
) -> io::Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    S: AsRef<OsStr>,
{
    traverse(directory, options, |file_type, file_path| {
        file_type.is_file()
            && file_path
                .extension()
                .map(|s| s == ext.as_ref())
                .unwrap_or(false)
    })
}

/// Copies every file with extension `ext` below `src_dir` into `dst_dir`,
/// keeping each file's path relative to `src_dir`.
/// Existing destination files are overwritten.
pub fn copy_files_by_ext<P, Q, S>(src_dir: P, dst_dir: Q, ext: S) -> io::Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<OsStr>,
{
    let src_dir = src_dir.as_ref();
    let dst_dir = dst_dir.as_ref();

    let mut copied = Vec::new();
    for src_file in list_files_by_ext(src_dir, ext, TraverseOptions { recursive: true })? {
        let relative_path = src_file.strip_prefix(src_dir).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Cannot copy {}, file is not inside {}",
                    src_file.display(),
                    src_dir.display()
                ),
            )
        })?;
        let dst_file = dst_dir.join(relative_path);
        if let Some(parent_dir) = dst_file.parent() {
            create_dir_all(parent_dir)?;
        }

        debug!("Copying '{}' to '{}'", src_file.display(), dst_file.display());
        copy(&src_file, &dst_file)?;
        copied.push(dst_file);
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_read_error_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing.gradle");

        let err = read_to_string(&file_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("missing.gradle"));
    }

    #[test]
    fn test_append_requires_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("build.gradle");

        assert!(append(&file_path, "task").is_err());
        assert!(!file_path.exists());

        write(&file_path, "apply plugin\n").unwrap();
        append(&file_path, "task\n").unwrap();
        assert_eq!(read_to_string(&file_path).unwrap(), "apply plugin\ntask\n");
    }

    #[test]
    fn test_copy_files_by_ext_mirrors_tree() {
        let temp_dir = TempDir::new().unwrap();
        let src_dir = temp_dir.path().join("symbols");
        let dst_dir = temp_dir.path().join("gradle").join("symbols");

        create_dir_all(src_dir.join("arm64-v8a")).unwrap();
        create_dir_all(src_dir.join("armeabi-v7a")).unwrap();
        write(src_dir.join("arm64-v8a/libil2cpp.so"), "arm64").unwrap();
        write(src_dir.join("armeabi-v7a/libunity.so"), "armv7").unwrap();
        write(src_dir.join("arm64-v8a/readme.txt"), "skip").unwrap();

        let mut copied = copy_files_by_ext(&src_dir, &dst_dir, "so").unwrap();
        copied.sort();

        assert_eq!(
            copied,
            vec![
                dst_dir.join("arm64-v8a/libil2cpp.so"),
                dst_dir.join("armeabi-v7a/libunity.so"),
            ]
        );
        assert_eq!(
            read_to_string(dst_dir.join("arm64-v8a/libil2cpp.so")).unwrap(),
            "arm64"
        );
        assert!(!dst_dir.join("arm64-v8a/readme.txt").exists());

        // Copying again overwrites in place
        write(src_dir.join("arm64-v8a/libil2cpp.so"), "rebuilt").unwrap();
        copy_files_by_ext(&src_dir, &dst_dir, "so").unwrap();
        assert_eq!(
            read_to_string(dst_dir.join("arm64-v8a/libil2cpp.so")).unwrap(),
            "rebuilt"
        );
    }
}
