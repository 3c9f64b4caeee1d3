use std::ops::Mul;

use chrono::TimeDelta;

use crate::quantity::energy::MegawattHours;

quantity!(Megawatts, suffix: "MW", precision: 3);

impl Mul<TimeDelta> for Megawatts {
    type Output = MegawattHours;

    fn mul(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        MegawattHours(self.0 * hours)
    }
}
