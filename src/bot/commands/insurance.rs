//! Insurance Discord commands - cover status, tier listing and subscription.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{insurance as cover_plans, member, money, report},
        entities::InsuranceTier,
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Shows your current health cover and the tiers your credit score unlocks.
    #[poise::command(slash_command, prefix_command)]
    pub async fn insurance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say("❌ You are not a member yet. Use `/register` to join.")
                .await?;
            return Ok(());
        };

        let mut embed = serenity::CreateEmbed::default()
            .title("🏥 SACCO Health Insurance")
            .color(0x001A_BC9C);

        if let Some(cover) = cover_plans::current_coverage(db, me.id).await? {
            let terms = cover_plans::tier_terms(cover.tier);
            let mut value = String::new();
            writeln!(
                &mut value,
                "**Cover:** {}",
                report::format_money(money::from_minor(cover.coverage_minor))
            )?;
            writeln!(
                &mut value,
                "**Premium:** {} per month",
                report::format_money(money::from_minor(cover.premium_minor))
            )?;
            writeln!(&mut value, "**Dependents:** {}", cover.dependents)?;
            write!(
                &mut value,
                "**Renews:** {} ({} days)",
                cover.renewal_date.format("%Y-%m-%d"),
                cover_plans::days_until_renewal(&cover, Utc::now())
            )?;
            embed = embed.field(format!("Your cover: {}", terms.name), value, false);
        }

        if me.credit_score < cover_plans::MIN_INSURANCE_SCORE {
            embed = embed.description(format!(
                "Insurance needs a credit score of at least {}. Yours is {}. \
                 Keep contributing to unlock cover.",
                cover_plans::MIN_INSURANCE_SCORE,
                me.credit_score
            ));
        } else {
            for terms in cover_plans::eligible_tiers(me.credit_score) {
                let mut value = String::new();
                writeln!(
                    &mut value,
                    "**Cover:** {} | **Premium:** {}/month",
                    report::format_money(terms.coverage),
                    report::format_money(terms.premium)
                )?;
                writeln!(
                    &mut value,
                    "**Dependents:** up to {}",
                    terms.max_dependents
                )?;
                for feature in terms.features {
                    writeln!(&mut value, "• {feature}")?;
                }
                embed = embed.field(
                    format!("{} (`{}`)", terms.name, terms.tier),
                    value,
                    false,
                );
            }
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Subscribes you to a health insurance tier.
    #[poise::command(slash_command, prefix_command)]
    pub async fn subscribe_insurance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Tier to subscribe to"]
        #[autocomplete = "autocomplete::autocomplete_insurance_tier"]
        tier: String,
        #[description = "Number of dependents to cover (default 0)"] dependents: Option<u32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let Some(me) = member::get_member_by_user(db, &user_id).await? else {
            ctx.say("❌ You are not a member yet. Use `/register` to join.")
                .await?;
            return Ok(());
        };

        let Some(tier) = InsuranceTier::parse(&tier) else {
            ctx.say(format!(
                "❌ Unknown tier '{tier}'. Choose basic, standard or premium."
            ))
            .await?;
            return Ok(());
        };

        match cover_plans::subscribe(db, me.id, tier, dependents.unwrap_or(0)).await {
            Ok(cover) => {
                let terms = cover_plans::tier_terms(cover.tier);
                ctx.say(format!(
                    "✅ You are now covered by **{}** ({} cover, {} per month).\n\
                     Renewal date: {}.",
                    terms.name,
                    report::format_money(terms.coverage),
                    report::format_money(terms.premium),
                    cover.renewal_date.format("%Y-%m-%d")
                ))
                .await?;
            }
            Err(Error::Insurance { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
