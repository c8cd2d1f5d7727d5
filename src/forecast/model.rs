use chrono::{Datelike, Duration, NaiveDate};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use std::f64::consts::PI;

use crate::error::StockcastError;

const YEAR_DAYS: f64 = 365.25;
const WEEK_DAYS: f64 = 7.0;
const RIDGE: f64 = 1e-6;

/// Additive trend + yearly + weekly regression, fitted by ridge least squares.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    pub yearly_order: usize,
    pub weekly_order: usize,
    /// Coverage of the uncertainty band, e.g. 0.8.
    pub interval_width: f64,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            yearly_order: 10,
            weekly_order: 3,
            interval_width: 0.8,
        }
    }
}

/// One forecast row, covering both fitted history and future dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
}

#[derive(Debug, Clone)]
pub struct FittedModel {
    coeffs: Vec<f64>,
    yearly_order: usize,
    weekly_order: usize,
    start: NaiveDate,
    span_days: f64,
    y_scale: f64,
    sigma: f64,
    z: f64,
    history: Vec<NaiveDate>,
}

impl AdditiveModel {
    pub fn fit(&self, series: &[(NaiveDate, f64)]) -> Result<FittedModel, StockcastError> {
        let mut obs: Vec<(NaiveDate, f64)> = series
            .iter()
            .copied()
            .filter(|(_, y)| y.is_finite())
            .collect();
        obs.sort_by_key(|(d, _)| *d);
        obs.dedup_by_key(|(d, _)| *d);

        let (Some(first), Some(last)) = (obs.first(), obs.last()) else {
            return Err(StockcastError::Forecast("no observations to fit".into()));
        };
        let start = first.0;
        let span_days = (last.0 - start).num_days() as f64;
        if obs.len() < 2 || span_days <= 0.0 {
            return Err(StockcastError::Forecast(
                "at least two distinct dates are required".into(),
            ));
        }

        let yearly_order = if span_days >= 2.0 * YEAR_DAYS {
            self.yearly_order
        } else {
            0
        };
        let weekly_order = if span_days >= 2.0 * WEEK_DAYS {
            self.weekly_order
        } else {
            0
        };

        let y_scale = obs
            .iter()
            .map(|(_, y)| y.abs())
            .fold(0.0_f64, f64::max)
            .max(f64::EPSILON);

        let width = 2 + 2 * yearly_order + 2 * weekly_order;
        let design: Vec<f64> = obs
            .iter()
            .flat_map(|(date, _)| features(*date, start, span_days, yearly_order, weekly_order))
            .collect();
        let x = DMatrix::from_row_slice(obs.len(), width, &design);
        let y = DVector::from_iterator(obs.len(), obs.iter().map(|(_, y)| y / y_scale));

        // Ridge on every column but the intercept; weekday-only series leave weekly terms collinear.
        let mut penalty = DVector::from_element(width, RIDGE);
        penalty[0] = 0.0;
        let xt = x.transpose();
        let normal = &xt * &x + DMatrix::from_diagonal(&penalty);
        let rhs = &xt * &y;

        let coeffs = match normal.clone().cholesky() {
            Some(chol) => chol.solve(&rhs),
            None => normal
                .lu()
                .solve(&rhs)
                .ok_or_else(|| StockcastError::Forecast("design matrix is singular".into()))?,
        };

        let dof = obs.len().saturating_sub(width).max(1) as f64;
        let sse = (&y - &x * &coeffs).norm_squared();

        Ok(FittedModel {
            coeffs: coeffs.iter().copied().collect(),
            yearly_order,
            weekly_order,
            start,
            span_days,
            y_scale,
            sigma: (sse / dof).sqrt() * y_scale,
            z: normal_quantile(0.5 + self.interval_width / 2.0),
            history: obs.into_iter().map(|(d, _)| d).collect(),
        })
    }
}

impl FittedModel {
    /// Rows for every fitted date followed by `horizon_days` consecutive calendar days.
    pub fn predict(&self, horizon_days: u32) -> Vec<ForecastRow> {
        let Some(&last) = self.history.last() else {
            return Vec::new();
        };
        let future = (1..=i64::from(horizon_days)).map(|k| last + Duration::days(k));

        self.history
            .iter()
            .copied()
            .chain(future)
            .map(|date| self.row(date, last))
            .collect()
    }

    pub fn residual_sigma(&self) -> f64 {
        self.sigma
    }

    fn row(&self, date: NaiveDate, last: NaiveDate) -> ForecastRow {
        let x = features(
            date,
            self.start,
            self.span_days,
            self.yearly_order,
            self.weekly_order,
        );
        let dot = |range: std::ops::Range<usize>| -> f64 {
            range.map(|i| x[i] * self.coeffs[i]).sum::<f64>() * self.y_scale
        };

        let yearly_end = 2 + 2 * self.yearly_order;
        let trend = dot(0..2);
        let yearly = dot(2..yearly_end);
        let weekly = dot(yearly_end..x.len());
        let yhat = trend + yearly + weekly;

        let ahead = (date - last).num_days().max(0) as f64;
        let half_width = self.z * self.sigma * (1.0 + ahead / self.span_days).sqrt();

        ForecastRow {
            date,
            yhat,
            yhat_lower: yhat - half_width,
            yhat_upper: yhat + half_width,
            trend,
            weekly,
            yearly,
        }
    }
}

fn features(
    date: NaiveDate,
    start: NaiveDate,
    span_days: f64,
    yearly_order: usize,
    weekly_order: usize,
) -> Vec<f64> {
    let t = (date - start).num_days() as f64 / span_days;
    // Absolute day number keeps seasonal phase tied to the calendar.
    let day = f64::from(date.num_days_from_ce());

    let mut x = Vec::with_capacity(2 + 2 * (yearly_order + weekly_order));
    x.push(1.0);
    x.push(t);
    fourier(&mut x, day, YEAR_DAYS, yearly_order);
    fourier(&mut x, day, WEEK_DAYS, weekly_order);
    x
}

fn fourier(out: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * day / period;
        out.push(angle.sin());
        out.push(angle.cos());
    }
}

/// Inverse standard normal CDF (Acklam's rational approximation).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e1,
        2.209460984245205e2,
        -2.759285104469687e2,
        1.383577518672690e2,
        -3.066479806614716e1,
        2.506628277459239,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e1,
        1.615858368580409e2,
        -1.556989798598866e2,
        6.680131188771972e1,
        -1.328068155288572e1,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-3,
        -3.223964580411365e-1,
        -2.400758277161838,
        -2.549732539343734,
        4.374664141464968,
        2.938163982698783,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-3,
        3.224671290700398e-1,
        2.445134137142996,
        3.754408661907416,
    ];
    const LOW: f64 = 0.02425;

    let p = p.clamp(1e-12, 1.0 - 1e-12);
    if p < LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -normal_quantile(1.0 - p)
    }
}
