// src/noyau/quantite.rs
//
// Quantités physiques : valeur décimale + unités (nom → exposant rationnel).
// Les exposants nuls sont retirés ; une quantité sans unité redevient un nombre
// (voir Valeur::depuis_quantite).

use num_rational::BigRational;
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::decimal::Decimal;

/// Nom de l’unité d’angle (seule unité acceptée par la trigonométrie).
pub const RADIAN: &str = "rad";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unites(BTreeMap<String, BigRational>);

impl Unites {
    pub fn vide() -> Self {
        Self::default()
    }

    pub fn une(nom: &str) -> Self {
        Self::nouvelles([(nom, 1)])
    }

    pub fn nouvelles<'a, I>(paires: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let map = paires
            .into_iter()
            .filter(|(_, p)| *p != 0)
            .map(|(n, p)| (n.to_string(), BigRational::from_integer(p.into())))
            .collect();
        Self(map)
    }

    pub fn est_vide(&self) -> bool {
        self.0.is_empty()
    }

    pub fn est_angle(&self) -> bool {
        self.0.len() == 1 && self.0.get(RADIAN).is_some_and(|p| p.is_one())
    }

    pub fn puissance(&self, nom: &str) -> BigRational {
        self.0.get(nom).cloned().unwrap_or_else(BigRational::zero)
    }

    /// Unités élevées à la puissance `n` (exposants multipliés).
    pub fn fois(&self, n: &BigRational) -> Self {
        if n.is_zero() {
            return Self::vide();
        }
        Self(self.0.iter().map(|(k, p)| (k.clone(), p * n)).collect())
    }

    fn combiner(&self, autre: &Unites, signe: i64) -> Self {
        let mut map = self.0.clone();
        let facteur = BigRational::from_integer(signe.into());
        for (nom, p) in &autre.0 {
            let entree = map.entry(nom.clone()).or_insert_with(BigRational::zero);
            *entree += p * &facteur;
        }
        map.retain(|_, p| !p.is_zero());
        Self(map)
    }
}

impl Add for &Unites {
    type Output = Unites;

    fn add(self, autre: &Unites) -> Unites {
        self.combiner(autre, 1)
    }
}

impl Sub for &Unites {
    type Output = Unites;

    fn sub(self, autre: &Unites) -> Unites {
        self.combiner(autre, -1)
    }
}

impl Neg for &Unites {
    type Output = Unites;

    fn neg(self) -> Unites {
        Unites(self.0.iter().map(|(k, p)| (k.clone(), -p)).collect())
    }
}

/// "m*s^-1", "m^(1/2)"
impl fmt::Display for Unites {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut premier = true;
        for (nom, p) in &self.0 {
            if !premier {
                f.write_str("*")?;
            }
            premier = false;

            if p.is_one() {
                write!(f, "{nom}")?;
            } else if p.is_integer() {
                write!(f, "{nom}^{p}")?;
            } else {
                write!(f, "{nom}^({p})")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quantite {
    pub valeur: Decimal,
    pub unites: Unites,
}

impl Quantite {
    pub fn new(valeur: Decimal, unites: Unites) -> Self {
        Self { valeur, unites }
    }

    /// Unité de base : 1 × nom
    pub fn unite(nom: &str) -> Self {
        Self::new(Decimal::un(), Unites::une(nom))
    }

    pub fn angle(valeur: Decimal) -> Self {
        Self::new(valeur, Unites::une(RADIAN))
    }

    pub fn avec_valeur(&self, valeur: Decimal) -> Self {
        Self::new(valeur, self.unites.clone())
    }
}
