//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module suggests payment methods, insurance tiers, and the caller's own loans
//! as the user types.

use crate::{
    bot::BotData,
    core::{insurance, loan, member},
    entities::{InsuranceTier, LoanModel, PaymentMethod},
    errors::Error,
};
use sea_orm::Iterable;

/// Provides autocomplete suggestions for payment methods.
#[allow(clippy::unused_async)] // poise awaits every autocomplete callback
pub async fn autocomplete_payment_method(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    PaymentMethod::iter()
        .map(|method| method.as_str().to_string())
        .filter(|method| method.contains(&partial_lower))
        .collect()
}

/// Provides autocomplete suggestions for insurance tiers.
///
/// Each suggestion is the tier's stored name so it parses back with
/// [`InsuranceTier::parse`].
#[allow(clippy::unused_async)]
pub async fn autocomplete_insurance_tier(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    InsuranceTier::iter()
        .filter(|tier| {
            tier.as_str().contains(&partial_lower)
                || insurance::tier_terms(*tier)
                    .name
                    .to_lowercase()
                    .contains(&partial_lower)
        })
        .map(|tier| tier.as_str().to_string())
        .collect()
}

/// Provides autocomplete suggestions for the caller's loan ids.
///
/// Only loans still being repaid are offered; an unregistered caller gets nothing.
pub async fn autocomplete_active_loan(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(Some(member)) = member::get_member_by_user(db, &user_id).await else {
        return Vec::new();
    };
    let Ok(loans) = loan::get_loans_for_member(db, member.id).await else {
        return Vec::new();
    };

    loans
        .into_iter()
        .filter(LoanModel::is_active)
        .map(|l| l.id.to_string())
        .filter(|id| id.starts_with(partial.trim()))
        .take(25) // Discord autocomplete limit
        .collect()
}
