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

use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use log::{debug, error, info, LevelFilter};

use symupload_common::fs;

mod args;
mod config;
mod logger;
mod toolchain;
mod upload;

use args::{Arguments, SubCommand};
use config::UploadOptions;
use logger::Logger;
use toolchain::ToolchainGeneration;
use upload::SymbolUpload;

const CLI_NAME: &str = "symupload";
const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
const CLI_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

struct Symupload {
    args: Arguments,
    log_file: PathBuf,
}

/* Initialization */
impl Symupload {
    fn new() -> Result<Self> {
        let args = Arguments::new()?;

        let log_dir = args.log_dir();
        fs::create_dir_all(&log_dir)?;

        let log_level_stdout = match &args.verbose {
            false => LevelFilter::Info,
            true => LevelFilter::Debug,
        };
        let log_level_max = args.log_level.max(log_level_stdout);
        Logger::initialize(&log_dir, log_level_max, log_level_stdout)?;

        Ok(Self {
            log_file: Logger::log_file(&log_dir),
            args,
        })
    }
}

/* Tool functions */
impl Symupload {
    fn upload_options(&self, include_sources: bool) -> Result<UploadOptions> {
        let mut options = match &self.args.config {
            Some(config) => UploadOptions::parse_from(config)?,
            None => UploadOptions::default(),
        };
        options.include_sources |= include_sources;

        Ok(options)
    }

    /// A bare command name is looked up from 'PATH'.
    fn find_cli(cli_path: &Path) -> PathBuf {
        if cli_path.components().count() != 1 || cli_path.exists() {
            return cli_path.to_path_buf();
        }
        match which::which(cli_path) {
            Ok(path) => {
                debug!("Found {} at {}", cli_path.display(), path.display());
                path
            }
            Err(_) => cli_path.to_path_buf(),
        }
    }

    fn create_patcher(&self) -> SymbolUpload {
        let generation = ToolchainGeneration::detect(&self.args.unity_version);
        debug!(
            "Unity {}, {} toolchain, {} backend",
            self.args.unity_version, generation, self.args.backend
        );

        SymbolUpload::new(
            &self.args.project_root,
            self.args.gradle_project(),
            generation,
            self.args.backend,
            self.args.export,
        )
    }
}

/* Main process */
impl Symupload {
    fn run(&self) -> Result<()> {
        debug!("{}", self.args);

        let patcher = self.create_patcher();
        match &self.args.subcommand {
            SubCommand::Inject {
                cli_path,
                include_sources,
            } => {
                let options = self.upload_options(*include_sources)?;
                let cli_path = Self::find_cli(cli_path);

                patcher.inject(&cli_path, &options).with_context(|| {
                    format!(
                        "Failed to add symbol upload task to {}",
                        patcher.script_path().display()
                    )
                })?;
            }
            SubCommand::Remove => {
                patcher.remove().with_context(|| {
                    format!(
                        "Failed to remove symbol upload task from {}",
                        patcher.script_path().display()
                    )
                })?;
            }
            SubCommand::CopySymbols => {
                let count = patcher
                    .copy_symbols_if_legacy()
                    .context("Failed to copy debug symbols")?;
                debug!("Copied {} symbol file(s)", count);
            }
            SubCommand::Paths => {
                print!("{}", patcher.upload_paths());
                return Ok(());
            }
        }

        info!("Done");
        Ok(())
    }
}

impl Drop for Symupload {
    fn drop(&mut self) {
        Logger::shutdown();
    }
}

fn main() {
    let instance = match Symupload::new() {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            process::exit(-1);
        }
    };

    if let Err(e) = instance.run() {
        error!("Error: {:?}", e);
        error!("For more information, please check {}", instance.log_file.display());

        drop(instance);
        process::exit(-1);
    }
}
