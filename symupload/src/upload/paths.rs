// SPDX-License-Identifier: Mulan PSL v2
/*
 * Copyright (c) 2024 Huawei Technologies Co., Ltd.
 * symupload is licensed under Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *         http://license.coscl.org.cn/MulanPSL2
 *
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND,
 * EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT,
 * MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use std::path::{Path, PathBuf};

use crate::toolchain::{ScriptingBackend, ToolchainGeneration};

/* Unity build layout, these have to follow the editor's internal directory structure */
pub const LEGACY_SYMBOLS_PATH: &str = "Temp/StagingArea/symbols";
pub const LEGACY_GRADLE_PATH: &str = "Temp/gradleOut";
pub const CURRENT_ARTIFACTS_PATH: &str = "Library/Bee/artifacts/Android";
pub const CURRENT_ANDROID_PATH: &str = "Library/Bee/Android";

/// Ordered, duplicate free list of directories scanned for debug symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadPathSet(Vec<PathBuf>);

impl UploadPathSet {
    fn push(&mut self, path: PathBuf) {
        if !self.0.contains(&path) {
            self.0.push(path);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a UploadPathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for UploadPathSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for path in self.iter() {
            writeln!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Where the symbol upload should look.
///
/// When exporting, the gradle project is built later by the user, so the whole
/// exported tree is scanned.
pub fn resolve<P, Q>(
    project_root: P,
    export_root: Q,
    generation: ToolchainGeneration,
    backend: ScriptingBackend,
    export_mode: bool,
) -> UploadPathSet
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let project_root = project_root.as_ref();
    let mut paths = UploadPathSet::default();

    if export_mode {
        paths.push(export_root.as_ref().to_path_buf());
        return paths;
    }

    let (il2cpp_path, build_path) = match generation {
        ToolchainGeneration::Legacy => (LEGACY_SYMBOLS_PATH, LEGACY_GRADLE_PATH),
        ToolchainGeneration::Current => (CURRENT_ARTIFACTS_PATH, CURRENT_ANDROID_PATH),
    };
    match backend {
        ScriptingBackend::Il2Cpp => paths.push(project_root.join(il2cpp_path)),
        ScriptingBackend::Mono => {}
    }
    paths.push(project_root.join(build_path));

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_ROOT: &str = "/unity/project";
    const EXPORT_ROOT: &str = "/unity/export";

    fn resolve_paths(
        generation: ToolchainGeneration,
        backend: ScriptingBackend,
        export_mode: bool,
    ) -> Vec<PathBuf> {
        resolve(PROJECT_ROOT, EXPORT_ROOT, generation, backend, export_mode)
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_legacy_il2cpp() {
        assert_eq!(
            resolve_paths(ToolchainGeneration::Legacy, ScriptingBackend::Il2Cpp, false),
            vec![
                PathBuf::from("/unity/project/Temp/StagingArea/symbols"),
                PathBuf::from("/unity/project/Temp/gradleOut"),
            ]
        );
    }

    #[test]
    fn test_legacy_mono() {
        assert_eq!(
            resolve_paths(ToolchainGeneration::Legacy, ScriptingBackend::Mono, false),
            vec![PathBuf::from("/unity/project/Temp/gradleOut")]
        );
    }

    #[test]
    fn test_current_il2cpp() {
        assert_eq!(
            resolve_paths(ToolchainGeneration::Current, ScriptingBackend::Il2Cpp, false),
            vec![
                PathBuf::from("/unity/project/Library/Bee/artifacts/Android"),
                PathBuf::from("/unity/project/Library/Bee/Android"),
            ]
        );
    }

    #[test]
    fn test_current_mono() {
        assert_eq!(
            resolve_paths(ToolchainGeneration::Current, ScriptingBackend::Mono, false),
            vec![PathBuf::from("/unity/project/Library/Bee/Android")]
        );
    }

    #[test]
    fn test_all_combinations() {
        let generations = [ToolchainGeneration::Legacy, ToolchainGeneration::Current];
        let backends = [ScriptingBackend::Mono, ScriptingBackend::Il2Cpp];

        for generation in generations {
            for backend in backends {
                let first = resolve_paths(generation, backend, false);
                assert_eq!(first, resolve_paths(generation, backend, false));

                let mut deduped = first.clone();
                deduped.sort();
                deduped.dedup();
                assert_eq!(deduped.len(), first.len());

                assert_eq!(
                    resolve_paths(generation, backend, true),
                    vec![PathBuf::from(EXPORT_ROOT)]
                );
            }
        }
    }
}
