use gronsky_web::PeriodToken;

/// Source of the period token for an invocation.
pub trait Clock: Send + Sync {
    fn period(&self) -> PeriodToken;
}

/// Local wall-clock month.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn period(&self) -> PeriodToken {
        PeriodToken::current_month()
    }
}

/// Always reports the same period (CLI overrides, tests).
#[derive(Debug, Clone)]
pub struct FixedPeriod(pub PeriodToken);

impl Clock for FixedPeriod {
    fn period(&self) -> PeriodToken {
        self.0.clone()
    }
}
