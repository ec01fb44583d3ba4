use colored::*;

use crate::benchmarks::{state_name, Lookup};
use crate::stats::{estimate_percentile, MarketTier, TierPolicy};
use crate::utils::{format_currency, log_info, ordinal};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaBadge {
    Positive(f64),
    Negative(f64),
    Neutral,
}

impl DeltaBadge {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            DeltaBadge::Positive(delta)
        } else if delta < 0.0 {
            DeltaBadge::Negative(delta)
        } else {
            DeltaBadge::Neutral
        }
    }

    pub fn text(&self) -> String {
        match self {
            DeltaBadge::Positive(delta) => format!("+{}", format_currency(*delta)),
            DeltaBadge::Negative(delta) => format_currency(*delta),
            DeltaBadge::Neutral => "= median".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub icon: &'static str,
    pub title: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallToAction {
    pub headline: &'static str,
    pub subtext: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Benchmarked {
    pub median: f64,
    pub highest: f64,
    pub delta: DeltaBadge,
    pub percentile: u8,
    pub tier: MarketTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub state_name: String,
    pub code: String,
    pub rate: f64,
    /// `None` when no statistics exist for the state.
    pub benchmark: Option<Benchmarked>,
}

impl Comparison {
    pub fn build(state: &str, code: &str, rate: f64, lookup: Lookup<'_>, policy: TierPolicy) -> Self {
        let benchmark = match lookup {
            Lookup::Found(stats) => Some(Benchmarked {
                median: stats.median(),
                highest: stats.p95,
                delta: DeltaBadge::from_delta(rate - stats.median()),
                percentile: estimate_percentile(rate, stats),
                tier: policy.classify(rate, stats),
            }),
            Lookup::Unavailable => None,
        };

        Comparison {
            state_name: state_name(state).to_string(),
            code: code.trim().to_string(),
            rate,
            benchmark,
        }
    }

    pub fn insight(&self) -> Insight {
        let state = &self.state_name;
        match self.benchmark.as_ref().map(|b| b.tier) {
            None => Insight {
                icon: "📍",
                title: "Data Unavailable",
                text: format!(
                    "We do not have sufficient data for {} to provide a reliable benchmark for this code.",
                    state
                ),
            },
            Some(MarketTier::Top) => Insight {
                icon: "🚀",
                title: "Above Market",
                text: format!(
                    "Great news, your rate is above the market average for {}. You've negotiated stronger-than-typical reimbursement for this service.",
                    state
                ),
            },
            Some(MarketTier::Below) => Insight {
                icon: "📉",
                title: "Below Market",
                text: format!(
                    "Your rate is below the market median for {}. Many ABA providers have negotiated higher rates for this service, so there may be room for improvement.",
                    state
                ),
            },
            Some(MarketTier::Competitive) => Insight {
                icon: "✅",
                title: "Market Competitive",
                text: format!(
                    "Your rate is in line with the market for {}. You're receiving competitive reimbursement compared to other ABA providers.",
                    state
                ),
            },
        }
    }

    pub fn call_to_action(&self) -> Option<CallToAction> {
        let tier = self.benchmark.as_ref()?.tier;
        Some(match tier {
            MarketTier::Top => CallToAction {
                headline: "🚀 Strong rates deserve strong operations.",
                subtext: "Top-performing ABA practices use healthcare-specific accounting and CFO tools to protect their margins and automate financial reporting.",
            },
            MarketTier::Below => CallToAction {
                headline: "📊 Room to negotiate higher rates",
                subtext: "CFO intelligence tools help you understand exactly where you're being underpaid, so you can negotiate with real payer data.",
            },
            MarketTier::Competitive => CallToAction {
                headline: "📍 Want to see what local clinics are charging?",
                subtext: "Get detailed rate breakdowns for ABA providers in your area. Book a quick call to see how you compare to clinics near you.",
            },
        })
    }

    pub fn render(&self) {
        log_info("State", &self.state_name);
        log_info("Code", &self.code);
        log_info("Your rate", &format_currency(self.rate).magenta().to_string());

        if let Some(bench) = &self.benchmark {
            log_info("State median", &format_currency(bench.median));
            log_info("Highest rate (p95)", &format_currency(bench.highest));

            let badge = bench.delta.text();
            let badge = match bench.delta {
                DeltaBadge::Positive(_) => badge.green(),
                DeltaBadge::Negative(_) => badge.red(),
                DeltaBadge::Neutral => badge.normal(),
            };
            log_info("vs median", &badge.to_string());
            log_info(
                "Percentile",
                &format!("~{}", ordinal(u32::from(bench.percentile))),
            );
        }

        let insight = self.insight();
        let title = match self.benchmark.as_ref().map(|b| b.tier) {
            Some(MarketTier::Top) => insight.title.green().bold(),
            Some(MarketTier::Below) => insight.title.red().bold(),
            Some(MarketTier::Competitive) => insight.title.cyan().bold(),
            None => insight.title.yellow().bold(),
        };
        println!();
        println!("{} {}", insight.icon, title);
        println!("{}", insight.text);

        if let Some(cta) = self.call_to_action() {
            println!();
            println!("{}", cta.headline.bold());
            println!("{}", cta.subtext.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PercentileStats;
    use approx::assert_relative_eq;

    fn stats() -> PercentileStats {
        PercentileStats {
            p5: 50.0,
            p10: 60.0,
            p25: 80.0,
            p50: 100.0,
            p75: 130.0,
            p90: 160.0,
            p95: 180.0,
        }
    }

    #[test]
    fn builds_benchmarked_comparison() {
        let stats = stats();
        let comparison = Comparison::build(
            "CA",
            " 97153 ",
            90.0,
            Lookup::Found(&stats),
            TierPolicy::Threshold,
        );

        assert_eq!(comparison.state_name, "California");
        assert_eq!(comparison.code, "97153");
        let bench = comparison.benchmark.as_ref().unwrap();
        assert_relative_eq!(bench.median, 100.0);
        assert_relative_eq!(bench.highest, 180.0);
        assert_eq!(bench.delta, DeltaBadge::Negative(-10.0));
        assert_eq!(bench.delta.text(), "-$10.00");
        assert_eq!(bench.percentile, 38);
        assert_eq!(bench.tier, MarketTier::Below);
        assert_eq!(comparison.insight().title, "Below Market");
        assert!(comparison.insight().text.contains("California"));
        assert_eq!(
            comparison.call_to_action().unwrap().headline,
            "📊 Room to negotiate higher rates"
        );
    }

    #[test]
    fn policy_changes_tier_only() {
        let stats = stats();
        let comparison = Comparison::build(
            "CA",
            "97153",
            90.0,
            Lookup::Found(&stats),
            TierPolicy::Percentile,
        );
        let bench = comparison.benchmark.unwrap();
        assert_eq!(bench.percentile, 38);
        assert_eq!(bench.tier, MarketTier::Competitive);
    }

    #[test]
    fn delta_badges() {
        assert_eq!(DeltaBadge::from_delta(12.5).text(), "+$12.50");
        assert_eq!(DeltaBadge::from_delta(0.0), DeltaBadge::Neutral);
        assert_eq!(DeltaBadge::Neutral.text(), "= median");
    }

    #[test]
    fn top_tier_copy() {
        let stats = stats();
        let comparison =
            Comparison::build("NY", "97153", 200.0, Lookup::Found(&stats), TierPolicy::Threshold);
        assert_eq!(comparison.insight().title, "Above Market");
        assert_eq!(comparison.benchmark.as_ref().unwrap().percentile, 97);
        assert_eq!(
            comparison.call_to_action().unwrap().headline,
            "🚀 Strong rates deserve strong operations."
        );
    }

    #[test]
    fn unavailable_state() {
        let comparison =
            Comparison::build("TX", "97153", 20.0, Lookup::Unavailable, TierPolicy::Threshold);
        assert!(comparison.benchmark.is_none());
        let insight = comparison.insight();
        assert_eq!(insight.title, "Data Unavailable");
        assert!(insight.text.contains("Texas"));
        assert!(comparison.call_to_action().is_none());
    }
}
