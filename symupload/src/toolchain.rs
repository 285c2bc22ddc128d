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

use std::{cmp::Ordering, str::FromStr};

/// Starting from 2021.2, Unity caches android build output inside 'Library' instead of 'Temp'.
pub const CURRENT_GENERATION_THRESHOLD: UnityVersion = UnityVersion {
    major: 2021,
    minor: 2,
    patch: 0,
};

/// Unity editor version, e.g. `2021.2.0f1`.
/// Release suffixes (`f1`, `b3`, `a10`...) do not take part in comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnityVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl UnityVersion {
    fn parse_component(component: &str, require_all_digits: bool) -> Option<u32> {
        let digits = component
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(index, _)| &component[..index])
            .unwrap_or(component);

        if digits.is_empty() || (require_all_digits && digits.len() != component.len()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl FromStr for UnityVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid unity version \"{}\"", s);

        let mut components = s.trim().split('.');
        let major = components
            .next()
            .and_then(|c| Self::parse_component(c, true))
            .ok_or_else(invalid)?;
        let minor = match components.next() {
            Some(c) => Self::parse_component(c, true).ok_or_else(invalid)?,
            None => 0,
        };
        let patch = match components.next() {
            Some(c) => Self::parse_component(c, false).ok_or_else(invalid)?,
            None => 0,
        };
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl Ord for UnityVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl PartialOrd for UnityVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for UnityVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Answers "is the host toolchain at least this version".
pub trait ToolchainVersion {
    fn is_newer_or_equal(&self, threshold: &UnityVersion) -> bool;
}

impl ToolchainVersion for UnityVersion {
    fn is_newer_or_equal(&self, threshold: &UnityVersion) -> bool {
        self >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainGeneration {
    /// Unity 2021.1 and older, build output lives in 'Temp'
    Legacy,
    /// Unity 2021.2 and newer, build output lives in 'Library/Bee'
    Current,
}

impl ToolchainGeneration {
    pub fn detect(version: &dyn ToolchainVersion) -> Self {
        match version.is_newer_or_equal(&CURRENT_GENERATION_THRESHOLD) {
            true => ToolchainGeneration::Current,
            false => ToolchainGeneration::Legacy,
        }
    }
}

impl std::fmt::Display for ToolchainGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolchainGeneration::Legacy => write!(f, "legacy"),
            ToolchainGeneration::Current => write!(f, "current"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptingBackend {
    Mono,
    Il2Cpp,
}

impl FromStr for ScriptingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mono" | "mono2x" => Ok(ScriptingBackend::Mono),
            "il2cpp" => Ok(ScriptingBackend::Il2Cpp),
            _ => Err(format!(
                "Invalid scripting backend \"{}\", expected \"mono\" or \"il2cpp\"",
                s
            )),
        }
    }
}

impl std::fmt::Display for ScriptingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptingBackend::Mono => write!(f, "mono"),
            ScriptingBackend::Il2Cpp => write!(f, "il2cpp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVersion(bool);

    impl ToolchainVersion for FixedVersion {
        fn is_newer_or_equal(&self, _threshold: &UnityVersion) -> bool {
            self.0
        }
    }

    #[test]
    fn test_parse_unity_version() {
        let version = "2021.2.0f1".parse::<UnityVersion>().unwrap();
        assert_eq!(
            version,
            UnityVersion {
                major: 2021,
                minor: 2,
                patch: 0
            }
        );
        assert_eq!("2019.4".parse::<UnityVersion>().unwrap().to_string(), "2019.4.0");
        assert_eq!("2022.3.17b2".parse::<UnityVersion>().unwrap().patch, 17);

        assert!("".parse::<UnityVersion>().is_err());
        assert!("unity".parse::<UnityVersion>().is_err());
        assert!("2021.x".parse::<UnityVersion>().is_err());
        assert!("2021.2.0.1".parse::<UnityVersion>().is_err());
    }

    #[test]
    fn test_generation_threshold() {
        let detect = |s: &str| ToolchainGeneration::detect(&s.parse::<UnityVersion>().unwrap());

        assert_eq!(detect("2020.3.48f1"), ToolchainGeneration::Legacy);
        assert_eq!(detect("2021.1.28f1"), ToolchainGeneration::Legacy);
        assert_eq!(detect("2021.2.0a1"), ToolchainGeneration::Current);
        assert_eq!(detect("2021.3.5f1"), ToolchainGeneration::Current);
        assert_eq!(detect("2023.1"), ToolchainGeneration::Current);
    }

    #[test]
    fn test_generation_uses_injected_version() {
        assert_eq!(
            ToolchainGeneration::detect(&FixedVersion(true)),
            ToolchainGeneration::Current
        );
        assert_eq!(
            ToolchainGeneration::detect(&FixedVersion(false)),
            ToolchainGeneration::Legacy
        );
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!("IL2CPP".parse(), Ok(ScriptingBackend::Il2Cpp));
        assert_eq!("mono".parse(), Ok(ScriptingBackend::Mono));
        assert!("dotnet".parse::<ScriptingBackend>().is_err());
    }
}
