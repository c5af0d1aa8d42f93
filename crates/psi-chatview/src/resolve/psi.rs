use super::{
    Resolved, VarContext, VarResolver, event_time, message, sender, sender_color, user_avatar,
};
use crate::config::Dialect;
use crate::datetime::DateTimeFormatter;

/// Native theme variables.
///
/// | Variable | Value |
/// |----------|-------|
/// | `%time%`, `%time{fmt}%` | event time in the session or given format |
/// | `%date%` | long date of a date separator |
/// | `%sender%` | escaped nick |
/// | `%avatarurl%` | author avatar |
/// | `%next%` | grouping slot |
/// | `%message%` | body, replaceable when the event has an id |
/// | `%senderColor%`, `%nickcolor%` | nick colour |
///
/// Anything else is looked up on the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsiResolver;

impl VarResolver for PsiResolver {
    fn dialect(&self) -> Dialect {
        Dialect::Psi
    }

    fn resolve(&self, name: &str, param: Option<&str>, ctx: &VarContext<'_>) -> Resolved {
        match name {
            "time" => {
                let custom = param.map(DateTimeFormatter::new);
                let formatter = custom.as_ref().unwrap_or(ctx.date_format);
                Resolved::Text(formatter.format(&event_time(ctx)))
            }
            "date" => Resolved::Text(
                ctx.event
                    .date
                    .map(|date| DateTimeFormatter::new("LL").format(&date))
                    .unwrap_or_default(),
            ),
            "sender" => sender(ctx),
            "avatarurl" => {
                let fallback = ctx.host.default_avatar_url();
                Resolved::Text(user_avatar(ctx, fallback.clone(), fallback))
            }
            "next" => Resolved::Slot,
            "message" => message(ctx),
            "senderColor" | "nickcolor" => Resolved::Text(sender_color(ctx)),
            other => Resolved::Text(ctx.event.field(other).unwrap_or_default()),
        }
    }
}
