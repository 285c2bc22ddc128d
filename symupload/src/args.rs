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

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{AppSettings, ColorChoice, Parser, Subcommand};
use log::LevelFilter;

use symupload_common::fs;

use super::{CLI_ABOUT, CLI_NAME, CLI_VERSION};
use crate::{
    toolchain::{ScriptingBackend, UnityVersion},
    upload::LEGACY_GRADLE_PATH,
};

const DEFAULT_PROJECT_ROOT: &str = ".";
const DEFAULT_BACKEND: &str = "il2cpp";
const DEFAULT_CLI_PATH: &str = "sentry-cli";
const DEFAULT_LOG_DIR_NAME: &str = "Logs";
const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Parser, Debug)]
#[clap(
    bin_name = CLI_NAME,
    version = CLI_VERSION,
    about = CLI_ABOUT,
    arg_required_else_help(true),
    color(ColorChoice::Never),
    global_setting(AppSettings::DeriveDisplayOrder),
    term_width(120),
)]
pub struct Arguments {
    /// Unity project directory
    #[clap(long, default_value = DEFAULT_PROJECT_ROOT)]
    pub project_root: PathBuf,

    /// Gradle project directory [default: <PROJECT_ROOT>/Temp/gradleOut]
    #[clap(long)]
    pub gradle_project: Option<PathBuf>,

    /// Unity editor version, e.g. "2021.3.5f1"
    #[clap(long)]
    pub unity_version: UnityVersion,

    /// Scripting backend ("mono"|"il2cpp")
    #[clap(long, default_value = DEFAULT_BACKEND)]
    pub backend: ScriptingBackend,

    /// The gradle project is exported and built outside of unity
    #[clap(long)]
    pub export: bool,

    /// Upload options file (yaml)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Logging directory [default: <PROJECT_ROOT>/Logs]
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Set the file logging level ("trace"|"debug"|"info"|"warn"|"error")
    #[clap(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: LevelFilter,

    /// Provide more detailed info
    #[clap(short, long)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Append the symbol upload task to the gradle script
    Inject {
        /// Path or command name of sentry-cli
        #[clap(long, default_value = DEFAULT_CLI_PATH)]
        cli_path: PathBuf,

        /// Upload source files along with debug symbols
        #[clap(long)]
        include_sources: bool,
    },
    /// Remove the symbol upload task from the gradle script
    Remove,
    /// Copy debug symbols into the exported gradle project
    CopySymbols,
    /// Print directories scanned for debug symbols
    Paths,
}

impl Arguments {
    pub fn new() -> Result<Self> {
        let mut args = Self::parse();
        args.normalize()?.check()?;

        Ok(args)
    }

    fn normalize(&mut self) -> Result<&mut Self> {
        self.project_root = fs::normalize(&self.project_root)?;

        let gradle_project = match &self.gradle_project {
            Some(path) => fs::normalize(path)?,
            None => self.project_root.join(LEGACY_GRADLE_PATH),
        };
        let log_dir = match &self.log_dir {
            Some(path) => fs::normalize(path)?,
            None => self.project_root.join(DEFAULT_LOG_DIR_NAME),
        };
        self.gradle_project = Some(gradle_project);
        self.log_dir = Some(log_dir);

        if let Some(config) = &self.config {
            self.config = Some(fs::normalize(config)?);
        }

        Ok(self)
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.project_root.is_dir(),
            format!("Cannot find directory {}", self.project_root.display())
        );
        if let Some(config) = &self.config {
            ensure!(
                config.is_file(),
                format!("Cannot find file {}", config.display())
            );
        }

        Ok(())
    }

    pub fn gradle_project(&self) -> PathBuf {
        self.gradle_project
            .clone()
            .unwrap_or_else(|| self.project_root.join(LEGACY_GRADLE_PATH))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.project_root.join(DEFAULT_LOG_DIR_NAME))
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self))
    }
}
