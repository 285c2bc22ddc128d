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

use lazy_static::lazy_static;
use regex::Regex;

pub const BLOCK_START_MARKER: &str = "// Autogenerated Sentry symbol upload task [start]";
pub const BLOCK_END_MARKER: &str = "// Autogenerated Sentry symbol upload task [end]";

/// Credentials reference every rendered block carries, used to detect earlier injections.
pub const BLOCK_FINGERPRINT: &str = "sentry.properties";

pub const UPLOAD_LOG_NAME: &str = "sentry-symbols-upload.log";

const MAPPING_FLAG: &str = "--il2cpp-mapping";
const SOURCES_FLAG: &str = "--include-sources";

lazy_static! {
    static ref BLOCK_REGEX: Regex = Regex::new(&format!(
        r"(?s){}.*?{}(?:\r?\n)?",
        regex::escape(BLOCK_START_MARKER),
        regex::escape(BLOCK_END_MARKER)
    ))
    .expect("Invalid symbol upload block regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTaskParameters {
    pub executable: String,
    pub directories: Vec<String>,
    pub include_sources: bool,
    pub log_root: String,
}

impl UploadTaskParameters {
    fn upload_args(&self) -> String {
        let mut args = vec![groovy_string(MAPPING_FLAG)];
        if self.include_sources {
            args.push(groovy_string(SOURCES_FLAG));
        }
        args.extend(self.directories.iter().map(|dir| groovy_string(dir)));

        args.join(", ")
    }
}

/// Double quoted groovy literal, '$' would otherwise start an interpolation.
fn groovy_string(value: &str) -> String {
    let escaped = value
        .replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('$', r"\$");
    format!("\"{}\"", escaped)
}

fn groovy_char_string(value: &str) -> String {
    let escaped = value.replace('\\', r"\\").replace('\'', r"\'");
    format!("'{}'", escaped)
}

/// Renders the gradle snippet running sentry-cli after the last task of the build,
/// wrapped in the start and end markers and terminated by a line break.
pub fn render(params: &UploadTaskParameters) -> String {
    let log_file = format!("{}/Logs/{}", params.log_root, UPLOAD_LOG_NAME);

    let mut block = String::new();
    block.push_str(BLOCK_START_MARKER);
    block.push('\n');
    block.push_str(
        "// Credentials and project settings information are stored in the sentry.properties file\n",
    );
    block.push_str("gradle.taskGraph.whenReady {\n");
    block.push_str("    gradle.taskGraph.allTasks[-1].doLast {\n");
    block.push_str(&format!(
        "        println 'Uploading symbols to Sentry. You can find the full log in ./Logs/{} (the file content may not be strictly sequential because it\\'s a merge of two streams).'\n",
        UPLOAD_LOG_NAME
    ));
    block.push_str(&format!(
        "        def sentryLogFile = new FileOutputStream({})\n",
        groovy_char_string(&log_file)
    ));
    block.push_str("        exec {\n");
    block.push_str(&format!(
        "            environment 'SENTRY_PROPERTIES', './{}'\n",
        BLOCK_FINGERPRINT
    ));
    block.push_str(&format!(
        "            executable {}\n",
        groovy_char_string(&params.executable)
    ));
    block.push_str(&format!(
        "            args = ['upload-dif', {}]\n",
        params.upload_args()
    ));
    block.push_str("            standardOutput sentryLogFile\n");
    block.push_str("            errorOutput sentryLogFile\n");
    block.push_str("        }\n");
    block.push_str("    }\n");
    block.push_str("}\n");
    block.push_str(BLOCK_END_MARKER);
    block.push('\n');

    block
}

/// Removes the first marked block, from its start marker through the first end
/// marker after it. Everything outside that span is kept as is.
pub fn strip(script: &str) -> String {
    BLOCK_REGEX.replacen(script, 1, "").into_owned()
}

pub fn already_injected(script: &str) -> bool {
    script.contains(BLOCK_FINGERPRINT)
}

/// Text to put between an existing script and an appended block so that the
/// start marker begins a line.
pub fn line_separator(script: &str) -> &'static str {
    if script.is_empty() || script.ends_with('\n') {
        ""
    } else {
        "\n"
    }
}
