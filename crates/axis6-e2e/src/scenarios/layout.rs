//! Responsive layout and page-load budget on the landing page.

use crate::pages::{LandingPage, PageObject};
use crate::result::{HarnessError, HarnessResult};
use crate::scenario::ScenarioContext;
use crate::viewport::{DeviceProfile, OVERFLOW_TOLERANCE_PX};
use futures::future::BoxFuture;

async fn check_layout(ctx: &ScenarioContext, profile: DeviceProfile) -> HarnessResult<()> {
    ctx.driver().set_viewport(&profile).await?;
    let landing = LandingPage::new(ctx.config());
    landing.goto(ctx.driver(), ctx.config()).await?;
    landing.verify_loaded(ctx.driver()).await?;

    let measured = ctx.driver().layout_metrics().await?;
    ctx.log().step(format!(
        "{}: content {}px, innerWidth {}px, breakpoint {}px",
        profile.name, measured.content_width, measured.viewport_width, profile.width
    ));
    let metrics = measured.against(&profile);
    if let Err(e) = ctx
        .screenshots()
        .capture(ctx.driver(), "responsive", &profile.slug())
        .await
    {
        ctx.log().warn(format!("screenshot not captured: {e}"));
    }

    if metrics.fits(OVERFLOW_TOLERANCE_PX) {
        return Ok(());
    }
    Err(HarnessError::assertion(format!(
        "horizontal overflow on {}: content {}px exceeds viewport {}px by {}px",
        profile.name,
        metrics.content_width,
        metrics.viewport_width,
        metrics.overflow_px()
    )))
}

macro_rules! responsive_scenarios {
    ($($fn_name:ident => $profile:expr),+ $(,)?) => {
        $(
            pub(super) fn $fn_name(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
                Box::pin(check_layout(ctx, $profile))
            }
        )+
    };
}

responsive_scenarios! {
    responsive_layout_iphone_se => DeviceProfile::IPHONE_SE,
    responsive_layout_iphone_12 => DeviceProfile::IPHONE_12,
    responsive_layout_android => DeviceProfile::ANDROID,
    responsive_layout_ipad => DeviceProfile::IPAD,
    responsive_layout_desktop => DeviceProfile::DESKTOP,
}

pub(super) fn landing_performance_budget(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let landing = LandingPage::new(ctx.config());
        landing.goto(ctx.driver(), ctx.config()).await?;
        landing.verify_loaded(ctx.driver()).await?;

        let timing = ctx.driver().navigation_timing().await?;
        ctx.log().step(format!(
            "DOMContentLoaded {:?}ms, load {:?}ms, FCP {:?}ms",
            timing.dom_content_loaded_ms, timing.load_ms, timing.first_contentful_paint_ms
        ));
        let violations = ctx.config().budget.check(&timing);
        if violations.is_empty() {
            return Ok(());
        }
        let listed: Vec<String> = violations.iter().map(ToString::to_string).collect();
        Err(HarnessError::assertion(format!(
            "landing page over budget: {}",
            listed.join("; ")
        )))
    })
}

#[cfg(feature = "api")]
pub(super) fn api_health_below_500(ctx: &ScenarioContext) -> BoxFuture<'_, HarnessResult<()>> {
    Box::pin(async move {
        let probe = crate::api::ApiProbe::new(ctx.config())?;
        let status = probe.check("/api/health").await;
        ctx.log().step(status.to_string());
        if status.is_alive() {
            return Ok(());
        }
        Err(HarnessError::assertion(format!("/api/health not alive: {status}")))
    })
}
