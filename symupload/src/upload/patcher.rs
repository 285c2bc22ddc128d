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

use log::{debug, info};

use symupload_common::fs;

use super::{
    error::{Result, UploadError},
    paths::{self, UploadPathSet, LEGACY_SYMBOLS_PATH},
    script_block::{self, UploadTaskParameters},
};
use crate::{
    config::UploadOptions,
    toolchain::{ScriptingBackend, ToolchainGeneration},
};

const GRADLE_SCRIPT_NAME: &str = "build.gradle";
const GRADLE_SYMBOLS_DIR: &str = "symbols";
const SYMBOL_FILE_EXT: &str = "so";

/// Maintains the sentry symbol upload task inside an android gradle project.
#[derive(Debug)]
pub struct SymbolUpload {
    project_root: PathBuf,
    gradle_project: PathBuf,
    script_path: PathBuf,
    generation: ToolchainGeneration,
    upload_paths: UploadPathSet,
}

impl SymbolUpload {
    pub fn new<P, Q>(
        project_root: P,
        gradle_project: Q,
        generation: ToolchainGeneration,
        backend: ScriptingBackend,
        export_mode: bool,
    ) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let project_root = project_root.as_ref().to_path_buf();
        let gradle_project = gradle_project.as_ref().to_path_buf();
        let script_path = gradle_project.join(GRADLE_SCRIPT_NAME);

        match (export_mode, generation) {
            (true, _) => info!(
                "Exporting the project. Root for symbols upload: {}",
                gradle_project.display()
            ),
            (false, ToolchainGeneration::Current) => {
                info!("Unity version 2021.2 or newer detected. Root for symbols upload: 'Library'.")
            }
            (false, ToolchainGeneration::Legacy) => {
                info!("Unity version 2021.1 or older detected. Root for symbols upload: 'Temp'.")
            }
        }
        let upload_paths = paths::resolve(
            &project_root,
            &gradle_project,
            generation,
            backend,
            export_mode,
        );

        Self {
            project_root,
            gradle_project,
            script_path,
            generation,
            upload_paths,
        }
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn upload_paths(&self) -> &UploadPathSet {
        &self.upload_paths
    }

    fn load_script(&self) -> Result<String> {
        if !self.script_path.is_file() {
            return Err(UploadError::ScriptNotFound(self.script_path.clone()));
        }
        Ok(fs::read_to_string(&self.script_path)?)
    }

    /// Appends the upload task to the gradle script, unless it is already there.
    /// Nothing is written when the executable or any symbol directory is missing.
    pub fn inject<P: AsRef<Path>>(&self, executable: P, options: &UploadOptions) -> Result<()> {
        let script = self.load_script()?;
        if script_block::already_injected(&script) {
            debug!("Symbol upload has already been added in a previous build.");
            return Ok(());
        }

        info!("Appending debug symbols upload task to gradle file.");

        let executable = fs::to_forward_slashes(executable);
        if !Path::new(&executable).is_file() {
            return Err(UploadError::ExecutableNotFound(PathBuf::from(executable)));
        }

        let mut directories = Vec::with_capacity(self.upload_paths.len());
        for upload_path in &self.upload_paths {
            if !upload_path.is_dir() {
                return Err(UploadError::SymbolDirectoryNotFound(upload_path.clone()));
            }
            debug!("Adding symbols directory {}", upload_path.display());
            directories.push(fs::to_forward_slashes(upload_path));
        }

        let params = UploadTaskParameters {
            executable,
            directories,
            include_sources: options.include_sources,
            log_root: fs::to_forward_slashes(&self.project_root),
        };
        let block = script_block::render(&params);

        fs::append(
            &self.script_path,
            format!("{}{}", script_block::line_separator(&script), block),
        )?;

        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        debug!("Removing the upload task from the gradle project.");

        let script = self.load_script()?;
        if !script_block::already_injected(&script) {
            debug!("No previous upload task found.");
            return Ok(());
        }

        fs::write(&self.script_path, script_block::strip(&script))?;

        Ok(())
    }

    /// Copies il2cpp symbol files into the exported gradle project.
    /// Current toolchains make them available to the gradle project on their own.
    pub fn copy_symbols_if_legacy(&self) -> Result<usize> {
        if self.generation == ToolchainGeneration::Current {
            debug!("New building backend. Skipping copying of debug symbols.");
            return Ok(0);
        }

        info!("Copying debug symbols to exported gradle project.");

        let symbols_dir = self.project_root.join(LEGACY_SYMBOLS_PATH);
        if !symbols_dir.is_dir() {
            return Err(UploadError::SymbolDirectoryNotFound(symbols_dir));
        }
        let target_dir = self.gradle_project.join(GRADLE_SYMBOLS_DIR);
        let copied = fs::copy_files_by_ext(&symbols_dir, &target_dir, SYMBOL_FILE_EXT)?;

        Ok(copied.len())
    }
}
