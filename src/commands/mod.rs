// commands
// Input commands for the lab and their line-oriented text form

use std::str::FromStr;

use crate::error::CommandParseError;
use crate::presets::{Liquid, Material};

pub mod dispatcher;

pub use dispatcher::process_command;

/// Inputs sent to the event loop thread.
#[derive(Clone, Debug, PartialEq)]
pub enum LabCommand {
    SetMass { mass: f64 },
    SetVolume { volume: f64 },
    SetLiquidDensity { liquid_density: f64 },
    SelectLiquid { liquid: Liquid },
    SelectMaterial { material: Material },
    Status,
    Shutdown,
}

impl FromStr for LabCommand {
    type Err = CommandParseError;

    /// `mass 200`, `volume 350`, `liquid miel`, `liquid 1.2`, `material acero`,
    /// `status`, `quit`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or(CommandParseError::Empty)?;
        let arg = parts.next();
        match verb.to_ascii_lowercase().as_str() {
            "mass" | "m" => Ok(LabCommand::SetMass {
                mass: number(arg.ok_or(CommandParseError::MissingArgument("mass"))?)?,
            }),
            "volume" | "v" => Ok(LabCommand::SetVolume {
                volume: number(arg.ok_or(CommandParseError::MissingArgument("volume"))?)?,
            }),
            "liquid" | "l" => {
                let arg = arg.ok_or(CommandParseError::MissingArgument("liquid"))?;
                if let Some(liquid) = Liquid::from_name(arg) {
                    Ok(LabCommand::SelectLiquid { liquid })
                } else if let Ok(liquid_density) = arg.parse::<f64>() {
                    Ok(LabCommand::SetLiquidDensity { liquid_density })
                } else {
                    Err(CommandParseError::UnknownPreset(arg.to_string()))
                }
            }
            "material" | "preset" => {
                let arg = arg.ok_or(CommandParseError::MissingArgument("material"))?;
                Material::from_name(arg)
                    .map(|material| LabCommand::SelectMaterial { material })
                    .ok_or_else(|| CommandParseError::UnknownPreset(arg.to_string()))
            }
            "status" => Ok(LabCommand::Status),
            "quit" | "exit" => Ok(LabCommand::Shutdown),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

fn number(s: &str) -> Result<f64, CommandParseError> {
    s.parse::<f64>()
        .map_err(|_| CommandParseError::InvalidNumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inputs() {
        assert_eq!("mass 200".parse::<LabCommand>(), Ok(LabCommand::SetMass { mass: 200.0 }));
        assert_eq!("V 12.5".parse::<LabCommand>(), Ok(LabCommand::SetVolume { volume: 12.5 }));
        assert_eq!(
            "liquid Miel".parse::<LabCommand>(),
            Ok(LabCommand::SelectLiquid { liquid: Liquid::Miel })
        );
        assert_eq!(
            "liquid 1.2".parse::<LabCommand>(),
            Ok(LabCommand::SetLiquidDensity { liquid_density: 1.2 })
        );
        assert_eq!(
            "material hielo".parse::<LabCommand>(),
            Ok(LabCommand::SelectMaterial { material: Material::Hielo })
        );
        assert_eq!("quit".parse::<LabCommand>(), Ok(LabCommand::Shutdown));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!("".parse::<LabCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "mass".parse::<LabCommand>(),
            Err(CommandParseError::MissingArgument("mass"))
        );
        assert_eq!(
            "mass lots".parse::<LabCommand>(),
            Err(CommandParseError::InvalidNumber("lots".into()))
        );
        assert_eq!(
            "material plomo".parse::<LabCommand>(),
            Err(CommandParseError::UnknownPreset("plomo".into()))
        );
        assert_eq!(
            "jump".parse::<LabCommand>(),
            Err(CommandParseError::Unknown("jump".into()))
        );
    }
}
