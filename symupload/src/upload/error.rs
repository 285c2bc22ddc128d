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

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to find the gradle config {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Failed to find sentry-cli at {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("Failed to find the symbols directory at {}", .0.display())]
    SymbolDirectoryNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}
