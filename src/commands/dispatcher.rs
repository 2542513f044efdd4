use std::ops::ControlFlow;
use std::time::Instant;

use tracing::info;

use super::LabCommand;
use crate::controller::LabController;
use crate::presets;

/// Process a single `LabCommand`. Breaks when the loop should stop.
pub fn process_command(cmd: LabCommand, controller: &mut LabController, now: Instant) -> ControlFlow<()> {
    match cmd {
        LabCommand::SetMass { mass } => controller.set_mass(mass, now),
        LabCommand::SetVolume { volume } => controller.set_volume(volume, now),
        LabCommand::SetLiquidDensity { liquid_density } => {
            controller.set_liquid_density(liquid_density, now)
        }
        LabCommand::SelectLiquid { liquid } => controller.select_liquid(liquid, now),
        LabCommand::SelectMaterial { material } => controller.select_material(material, now),
        LabCommand::Status => report_status(controller),
        LabCommand::Shutdown => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

fn report_status(controller: &LabController) {
    let frame = controller.frame();
    let state = controller.state();
    let density = format!("{:.2}", frame.buoyancy.density);
    let color = presets::hex(frame.material.color());
    let fill = presets::hex(frame.liquid_fill.color.into_format::<u8>());
    info!(
        mass = state.mass(),
        volume = state.volume(),
        density = %density,
        liquid = frame.liquid.map(|l| l.name()).unwrap_or("custom"),
        liquid_density = state.liquid_density(),
        fill = %fill,
        material = %frame.material,
        color = %color,
        size = frame.geometry.size,
        y = frame.geometry.y_position,
        particles = frame.geometry.particles.len(),
        "{}",
        frame.buoyancy.status_label()
    );
    info!("tutor: {}", frame.tutor_text);
    if let Some(fact) = &frame.tutor_fact {
        info!("{}", fact);
    }
    info!("reto: {}", frame.challenge.hint());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerSettings;
    use crate::explain::ExplanationClient;
    use crate::presets::{Liquid, Material};
    use crossbeam::channel;

    #[test]
    fn commands_reach_the_controller() {
        let (tx, _rx) = channel::unbounded();
        let now = Instant::now();
        let mut ctl = LabController::new(
            ControllerSettings::default(),
            None,
            ExplanationClient::offline(),
            tx,
            now,
        );
        let flow = [
            LabCommand::SelectMaterial { material: Material::Hielo },
            LabCommand::SelectLiquid { liquid: Liquid::Aceite },
            LabCommand::Status,
        ]
        .into_iter()
        .map(|cmd| process_command(cmd, &mut ctl, now))
        .all(|f| f.is_continue());
        assert!(flow);
        assert_eq!(ctl.state().mass(), 276.0);
        assert!(!ctl.buoyancy().is_floating);
        assert!(process_command(LabCommand::Shutdown, &mut ctl, now).is_break());
    }
}
