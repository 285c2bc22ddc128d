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
    env,
    io,
    path::{Component, Path, PathBuf},
};

/// Makes `path` absolute and resolves `.` and `..` lexically.
pub fn normalize<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let mut new_path = PathBuf::new();

    let orig_path = path.as_ref();
    if orig_path.as_os_str().is_empty() {
        return Ok(new_path);
    }

    if orig_path.is_relative() {
        new_path.push(env::current_dir()?);
    }

    for component in orig_path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                new_path.pop();
                if !new_path.has_root() {
                    new_path.push(Component::RootDir);
                }
            }
            _ => {
                new_path.push(component);
            }
        }
    }

    Ok(new_path)
}

/// Gradle cannot handle backslashes in paths, every separator becomes '/'.
pub fn to_forward_slashes<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("/unity/project/./Temp/../Library").unwrap(),
            PathBuf::from("/unity/project/Library")
        );
        assert_eq!(normalize("").unwrap(), PathBuf::new());
        assert!(normalize("Assets").unwrap().is_absolute());
    }

    #[test]
    fn test_to_forward_slashes() {
        assert_eq!(
            to_forward_slashes(r"C:\Program Files\sentry-cli.exe"),
            "C:/Program Files/sentry-cli.exe"
        );
        assert_eq!(to_forward_slashes("/usr/bin/sentry-cli"), "/usr/bin/sentry-cli");
    }
}
