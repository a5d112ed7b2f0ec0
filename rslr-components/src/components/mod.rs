mod antarctic_dynamics;
mod antarctic_smb;
mod glacier;
mod greenland_dynamics;
mod greenland_smb;
mod land_water;
mod time_projection;

pub use antarctic_dynamics::AntarcticDynamics;
pub use antarctic_smb::AntarcticSMB;
pub use glacier::Glacier;
pub use greenland_dynamics::GreenlandDynamics;
pub use greenland_smb::GreenlandSMB;
pub use land_water::LandWater;
pub use time_projection::{FinalAmount, TimeProjection};

#[cfg(test)]
pub(crate) mod test_utils {
    use ndarray::{Array1, Array2, Axis};
    use rslr_core::drivers::ClimateDrivers;
    use rslr_core::template::Template;
    use rslr_core::timeseries::TimeAxis;

    /// Steadily warming climate realisations, one value at the end of each year to 2100
    pub fn drivers(n_climate: usize) -> ClimateDrivers {
        let time = TimeAxis::year_ends(2006, 2099);
        let nyr = time.len();
        let temperature =
            Array2::from_shape_fn((n_climate, nyr), |(c, j)| 0.6 + 0.02 * j as f64 + 0.1 * c as f64);
        let mut integrated = temperature.clone();
        integrated.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
        let integrated_mean: Array1<f64> = integrated.mean_axis(Axis(0)).unwrap();
        let expansion = Array2::from_shape_fn((n_climate, nyr), |(_, j)| 0.002 * j as f64);
        ClimateDrivers::new(temperature, integrated, integrated_mean, expansion, time).unwrap()
    }

    pub fn template(n_component: usize, drivers: &ClimateDrivers) -> Template {
        Template::new(n_component, drivers.n_climate(), drivers.time().clone()).unwrap()
    }
}
