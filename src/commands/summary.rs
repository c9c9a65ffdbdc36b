use crate::args::Inputs;
use crate::commands::Out;
use crate::report::{build_dashboard, DashboardModel};
use crate::{render, workbook, Config, Result};
use anyhow::Context;

/// Builds the dashboard from the two exports named in `inputs`. The message is the rendered
/// dashboard and the structure is the full model.
///
/// # Errors
/// - Returns an error if either file cannot be opened as a workbook.
/// - Returns an `InputError` for missing sheets or columns.
pub fn summary(config: Config, inputs: &Inputs) -> Result<Out<DashboardModel>> {
    let model = load_dashboard(config, inputs)?;
    Ok(Out::new(render::dashboard(&model), model))
}

pub(super) fn load_dashboard(config: Config, inputs: &Inputs) -> Result<DashboardModel> {
    let config = inputs.apply(config);
    let mut timesheet = workbook::open(inputs.timesheet()).with_context(|| {
        format!(
            "Unable to open the timesheet export {}",
            inputs.timesheet().display()
        )
    })?;
    let mut bandwidth = workbook::open(inputs.bandwidth()).with_context(|| {
        format!(
            "Unable to open the bandwidth export {}",
            inputs.bandwidth().display()
        )
    })?;
    build_dashboard(timesheet.as_mut(), bandwidth.as_mut(), &config)
}
