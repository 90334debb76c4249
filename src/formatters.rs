// ABOUTME: Localization layer turning structured replies and error kinds into chat text
// ABOUTME: Consumes the tagged enums; no formatting logic leaks into the protocol core
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Reply Formatting
//!
//! User-facing text for the chat layer in the two locales the original
//! deployment shipped. Auth-state errors become friendly messages here;
//! they are never allowed to crash command dispatch.

use crate::chart::PieSection;
use crate::commands::CommandReply;
use crate::errors::AuthError;

/// Supported chat locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English (US)
    #[default]
    EnUs,
    /// Simplified Chinese
    ZhCn,
}

/// Render a command reply as chat text
#[must_use]
pub fn render_reply(locale: Locale, reply: &CommandReply) -> String {
    match reply {
        CommandReply::AuthorizeUrl { url } => match locale {
            Locale::EnUs => format!("Please visit the link to authorize:\n{url}"),
            Locale::ZhCn => format!("请访问链接完成授权：\n{url}"),
        },
        CommandReply::AuthStatus {
            username,
            expires_at,
        } => {
            let name = username.as_deref().unwrap_or("(unknown)");
            let date = expires_at.to_rfc2822();
            match locale {
                Locale::EnUs => {
                    format!("Authorized as {name}.\nAuthorization expires at {date}.")
                }
                Locale::ZhCn => format!("已授权账号 {name}。\n授权将于 {date} 过期。"),
            }
        }
        CommandReply::Revoked => match locale {
            Locale::EnUs => "Authorization revoked.".to_owned(),
            Locale::ZhCn => "已撤销授权。".to_owned(),
        },
        CommandReply::Stats { data, .. } => {
            let range = data.human_readable_range.as_deref().unwrap_or("");
            let name = data.username.as_deref().unwrap_or("(unknown)");
            let total = data
                .human_readable_total_including_other_language
                .as_deref()
                .unwrap_or("0 secs");
            match locale {
                Locale::EnUs => format!("WakaTime stats for {name} ({range})\nTotal: {total}"),
                Locale::ZhCn => format!("{name} 的 WakaTime 统计（{range}）\n总计：{total}"),
            }
        }
    }
}

/// Render a protocol error as chat text
#[must_use]
pub fn render_error(locale: Locale, err: &AuthError) -> String {
    match err {
        AuthError::NotAuthorized => match locale {
            Locale::EnUs => {
                "You have not authorized a WakaTime account. Run the auth command first.".to_owned()
            }
            Locale::ZhCn => "尚未授权 WakaTime 账号，请先使用 auth 命令。".to_owned(),
        },
        AuthError::AuthorizationExpired => match locale {
            Locale::EnUs => "Your WakaTime authorization has expired. Please authorize again.".to_owned(),
            Locale::ZhCn => "WakaTime 授权已过期，请重新授权。".to_owned(),
        },
        AuthError::Network {
            action,
            status,
            message,
        } => {
            let detail = status.map_or_else(String::new, |code| format!("{code} "));
            match locale {
                Locale::EnUs => format!("Failed while {action}: {detail}{message}"),
                Locale::ZhCn => format!("{action} 失败：{detail}{message}"),
            }
        }
        other => match locale {
            Locale::EnUs => format!("Something went wrong: {other}"),
            Locale::ZhCn => format!("出现错误：{other}"),
        },
    }
}

/// Localized chart title for a stats section
#[must_use]
pub const fn chart_title(locale: Locale, section: PieSection) -> &'static str {
    match (locale, section) {
        (Locale::EnUs, PieSection::Languages) => "Languages",
        (Locale::EnUs, PieSection::Editors) => "Editors",
        (Locale::EnUs, PieSection::Machines) => "Machines",
        (Locale::EnUs, PieSection::OperatingSystems) => "Operating Systems",
        (Locale::ZhCn, PieSection::Languages) => "语言",
        (Locale::ZhCn, PieSection::Editors) => "编辑器",
        (Locale::ZhCn, PieSection::Machines) => "设备",
        (Locale::ZhCn, PieSection::OperatingSystems) => "操作系统",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn authorize_reply_contains_url() {
        let reply = CommandReply::AuthorizeUrl {
            url: "https://wakatime.com/oauth/authorize?x=1".into(),
        };
        for locale in [Locale::EnUs, Locale::ZhCn] {
            assert!(render_reply(locale, &reply).contains("https://wakatime.com/oauth/authorize"));
        }
    }

    #[test]
    fn every_error_kind_renders_in_both_locales() {
        let errors = [
            AuthError::NotAuthorized,
            AuthError::AuthorizationExpired,
            AuthError::InvalidCorrelation,
            AuthError::Network {
                action: "getting stats".into(),
                status: Some(502),
                message: "bad gateway".into(),
            },
        ];
        for err in &errors {
            for locale in [Locale::EnUs, Locale::ZhCn] {
                assert!(!render_error(locale, err).is_empty());
            }
        }
    }

    #[test]
    fn network_error_shows_action_and_status() {
        let err = AuthError::Network {
            action: "getting stats".into(),
            status: Some(502),
            message: "bad gateway".into(),
        };
        let text = render_error(Locale::EnUs, &err);
        assert!(text.contains("getting stats"));
        assert!(text.contains("502"));
    }

    #[test]
    fn auth_status_shows_expiry() {
        let expires_at = Utc::now();
        let reply = CommandReply::AuthStatus {
            username: Some("waka-user".into()),
            expires_at,
        };
        let text = render_reply(Locale::EnUs, &reply);
        assert!(text.contains("waka-user"));
        assert!(text.contains(&expires_at.to_rfc2822()));
    }
}
