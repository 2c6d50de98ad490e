//! Bounded per-character burst resource.

use crate::combat::Element;
use crate::config::EnergyConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyLedger {
    current: f64,
    max: f64,
}

/// Who is receiving a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleReceiver {
    pub element: Element,
    pub on_field: bool,
}

impl EnergyLedger {
    /// A full ledger.
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn empty(max: f64) -> Self {
        Self { current: 0.0, max }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Adds flat energy, capped at max. Returns the amount actually gained.
    pub fn add(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    /// Removes exactly `amount`, or nothing if there is not enough.
    pub fn consume(&mut self, amount: f64) -> Result<(), f64> {
        if self.current + f64::EPSILON < amount {
            return Err(self.current);
        }
        self.current = (self.current - amount).max(0.0);
        Ok(())
    }

    /// Removes up to `amount`; returns what was removed.
    pub fn consume_up_to(&mut self, amount: f64) -> f64 {
        let taken = amount.clamp(0.0, self.current);
        self.current -= taken;
        taken
    }

    /// Empties the ledger; returns what was drained.
    pub fn drain(&mut self) -> f64 {
        std::mem::take(&mut self.current)
    }

    /// Energy gained from `count` particles of `source`.
    pub fn receive_particles(
        &mut self,
        source: Element,
        count: f64,
        receiver: ParticleReceiver,
        energy_recharge: f64,
        config: &EnergyConfig,
    ) -> f64 {
        let per_particle = if source == Element::Physical {
            config.neutral
        } else if source == receiver.element {
            config.same_element
        } else {
            config.off_element
        };
        let field = if receiver.on_field {
            1.0
        } else {
            config.off_field_factor
        };
        self.add(per_particle * count * field * (1.0 + energy_recharge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_refuses_when_short() {
        let mut energy = EnergyLedger::empty(60.0);
        energy.add(30.0);
        assert_eq!(energy.consume(40.0), Err(30.0));
        assert_eq!(energy.current(), 30.0);
        assert_eq!(energy.consume(30.0), Ok(()));
        assert_eq!(energy.current(), 0.0);
    }

    #[test]
    fn add_caps_at_max() {
        let mut energy = EnergyLedger::full(40.0);
        assert_eq!(energy.add(10.0), 0.0);
        assert!(energy.is_full());
        assert_eq!(energy.drain(), 40.0);
    }

    #[test]
    fn particles_depend_on_element_and_field() {
        let config = EnergyConfig::default();
        let cryo_on_field = ParticleReceiver {
            element: Element::Cryo,
            on_field: true,
        };
        let geo_off_field = ParticleReceiver {
            element: Element::Geo,
            on_field: false,
        };

        let mut a = EnergyLedger::empty(100.0);
        assert_eq!(a.receive_particles(Element::Cryo, 2.0, cryo_on_field, 0.0, &config), 6.0);

        let mut b = EnergyLedger::empty(100.0);
        let gained = b.receive_particles(Element::Cryo, 2.0, geo_off_field, 0.5, &config);
        assert!((gained - 1.0 * 2.0 * 0.6 * 1.5).abs() < 1e-12);
    }
}
