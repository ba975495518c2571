// This file is part of chainindex.
// Copyright (C) 2025 Midnight Foundation
// SPDX-License-Identifier: Apache-2.0
// Licensed under the Apache License, Version 2.0 (the "License");
// You may not use this file except in compliance with the License.
// You may obtain a copy of the License at
// http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Validation of raw request parameters.
//!
//! Integers are matched against a strict decimal grammar before being parsed, hence inputs like
//! `1.1`, `1e3`, `+1` or ` 1` are rejected rather than coerced.

use crate::{domain::Pagination, infra::api::v1::route_path::RoutePath};
use regex::Regex;
use std::{num::NonZeroU64, sync::LazyLock};
use thiserror::Error;

pub const ID: &str = "id";
pub const HEIGHT: &str = "height";
pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";

// ASCII digits only: `\d` would also match other Unicode decimal digits.
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^-?[0-9]+$").expect("integer pattern is valid"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing parameter `{0}`")]
    Missing(&'static str),

    #[error("parameter `{0}` must be an integer")]
    NotAnInteger(&'static str),

    #[error("parameter `{0}` must not be negative")]
    Negative(&'static str),

    #[error("parameter `{0}` must be positive")]
    NotPositive(&'static str),

    #[error("parameter `{0}` is out of range")]
    OutOfRange(&'static str),
}

/// Default and maximum number of records per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    default: NonZeroU64,
    max: NonZeroU64,
}

impl PageSize {
    /// The default page size never exceeds the maximum one.
    pub fn new(default: NonZeroU64, max: NonZeroU64) -> Self {
        Self {
            default: default.min(max),
            max,
        }
    }
}

/// Parse a required non-negative integer, e.g. a block height.
pub fn parse_non_negative(name: &'static str, value: Option<&str>) -> Result<u64, ParamError> {
    let value = value.ok_or(ParamError::Missing(name))?;

    if !INTEGER.is_match(value) {
        return Err(ParamError::NotAnInteger(name));
    }
    if value.starts_with('-') {
        return Err(ParamError::Negative(name));
    }

    value.parse().map_err(|_| ParamError::OutOfRange(name))
}

/// Parse a required positive integer, e.g. a council node ID or a page number.
pub fn parse_positive(name: &'static str, value: Option<&str>) -> Result<NonZeroU64, ParamError> {
    let value = parse_non_negative(name, value)?;
    NonZeroU64::new(value).ok_or(ParamError::NotPositive(name))
}

/// Parse the optional `page` and `limit` query parameters: the page defaults to the first one,
/// the limit to the default page size and is capped at the maximum page size.
pub fn parse_pagination(
    route_path: &RoutePath,
    page_size: PageSize,
) -> Result<Pagination, ParamError> {
    let page = route_path
        .query(PAGE)
        .map(|page| parse_positive(PAGE, Some(page)))
        .transpose()?
        .unwrap_or(NonZeroU64::MIN);

    let limit = route_path
        .query(LIMIT)
        .map(|limit| parse_positive(LIMIT, Some(limit)))
        .transpose()?
        .map(|limit| limit.min(page_size.max))
        .unwrap_or(page_size.default);

    Ok(Pagination::new(page, limit))
}

#[cfg(test)]
mod tests {
    use crate::infra::api::v1::{
        params::{
            ID, PAGE, PageSize, ParamError, parse_non_negative, parse_pagination, parse_positive,
        },
        route_path::RoutePath,
    };
    use assert_matches::assert_matches;
    use std::num::NonZeroU64;

    fn page_size(default: u64, max: u64) -> PageSize {
        PageSize::new(
            NonZeroU64::new(default).expect("default is positive"),
            NonZeroU64::new(max).expect("max is positive"),
        )
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative(ID, Some("10")), Ok(10));
        assert_eq!(parse_non_negative(ID, Some("0")), Ok(0));
        assert_eq!(parse_non_negative(ID, Some("007")), Ok(7));
        assert_eq!(
            parse_non_negative(ID, Some("18446744073709551615")),
            Ok(u64::MAX)
        );

        assert_eq!(parse_non_negative(ID, None), Err(ParamError::Missing(ID)));
        assert_eq!(parse_non_negative(ID, Some("-10")), Err(ParamError::Negative(ID)));
        assert_eq!(parse_non_negative(ID, Some("-0")), Err(ParamError::Negative(ID)));
        assert_eq!(
            parse_non_negative(ID, Some("18446744073709551616")),
            Err(ParamError::OutOfRange(ID))
        );

        for value in [
            "", "invalid", "1.1", "1.0", "1e3", "+1", " 1", "1 ", "0x10", "--1", "1-", "١٢",
        ] {
            assert_eq!(
                parse_non_negative(ID, Some(value)),
                Err(ParamError::NotAnInteger(ID)),
                "value {value:?}"
            );
        }
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive(PAGE, Some("2")), Ok(NonZeroU64::new(2).unwrap()));
        assert_eq!(parse_positive(PAGE, Some("0")), Err(ParamError::NotPositive(PAGE)));
        assert_eq!(parse_positive(PAGE, Some("-1")), Err(ParamError::Negative(PAGE)));
        assert_eq!(
            parse_positive(PAGE, Some("invalid")),
            Err(ParamError::NotAnInteger(PAGE))
        );
        assert_eq!(parse_positive(ID, None), Err(ParamError::Missing(ID)));
        assert_eq!(parse_positive(ID, Some("0")), Err(ParamError::NotPositive(ID)));
        assert_eq!(parse_positive(ID, Some("10")), Ok(NonZeroU64::new(10).unwrap()));
    }

    #[test]
    fn test_parse_pagination() {
        let pagination = parse_pagination(&RoutePath::default(), page_size(20, 100));
        assert_matches!(pagination, Ok(p) if p.page.get() == 1 && p.limit.get() == 20);

        let route_path = RoutePath::default().with_query("page", "3").with_query("limit", "5");
        let pagination = parse_pagination(&route_path, page_size(20, 100));
        assert_matches!(pagination, Ok(p) if p.page.get() == 3 && p.limit.get() == 5);

        let route_path = RoutePath::default().with_query("limit", "1000");
        let pagination = parse_pagination(&route_path, page_size(20, 100));
        assert_matches!(pagination, Ok(p) if p.limit.get() == 100);

        let pagination = parse_pagination(&RoutePath::default(), page_size(200, 100));
        assert_matches!(pagination, Ok(p) if p.limit.get() == 100);

        for page in ["invalid", "", "0", "-1", "1.5"] {
            let route_path = RoutePath::default().with_query("page", page);
            let pagination = parse_pagination(&route_path, page_size(20, 100));
            assert!(pagination.is_err(), "page {page:?}");
        }

        let route_path = RoutePath::default().with_query("limit", "0");
        let pagination = parse_pagination(&route_path, page_size(20, 100));
        assert_eq!(pagination, Err(ParamError::NotPositive("limit")));
    }
}
