// src/noyau/decimal.rs
//
// Décimal à précision fixe (sans flottants)
// -----------------------------------------
// - valeur = mantisse × 10^exposant (mantisse BigInt)
// - chaque opération arrondit (demi-pair) à `Contexte::precision` chiffres significatifs
// - la précision est un PARAMÈTRE (jamais un état global) : l’élargir pour une série
//   ou la réduire pour la double évaluation ne fuit jamais hors de l’appel
//
// Outils repris de la lecture scalée : pow10, racine entière (Newton), π (Machin) + cache.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use thiserror::Error;

use super::erreur::{ErreurArith, ResultatArith};

/* ------------------------ Contexte (précision explicite) ------------------------ */

/// Précision de travail : nombre de chiffres significatifs conservés.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contexte {
    pub precision: u32,
}

impl Contexte {
    pub fn nouveau(precision: u32) -> Self {
        Self {
            precision: precision.max(1),
        }
    }

    /// Précision élargie (chiffres de garde pour séries / réductions).
    pub fn elargi(self, chiffres: u32) -> Self {
        Self::nouveau(self.precision.saturating_add(chiffres))
    }

    /// Précision réduite (double évaluation), jamais sous 1 chiffre.
    pub fn reduit(self, chiffres: u32) -> Self {
        Self::nouveau(self.precision.saturating_sub(chiffres))
    }
}

/* ------------------------ Helpers BigInt ------------------------ */

/// Borne des exposants : les sommes et différences de deux exposants bornés restent
/// loin des limites de i64.
pub const EXPOSANT_MAX: i64 = 1_000_000_000_000_000;

fn exposant_borne(e: Option<i64>) -> ResultatArith<i64> {
    e.filter(|e| e.unsigned_abs() <= EXPOSANT_MAX.unsigned_abs())
        .ok_or(ErreurArith::Depassement("exposant"))
}

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// Nombre de chiffres décimaux de |n| (0 compte pour 1 chiffre).
pub(crate) fn nb_chiffres(n: &BigInt) -> u32 {
    if n.is_zero() {
        return 1;
    }
    n.magnitude().to_str_radix(10).len() as u32
}

/// n / 10^k arrondi au plus proche, égalité vers le pair.
fn diviser_arrondi(n: &BigInt, k: u32) -> BigInt {
    if k == 0 {
        return n.clone();
    }
    let div = pow10(k);
    let q = n / &div;
    let r = n % &div; // même signe que n

    let double = r.abs() * 2u32;
    let monter = match double.cmp(&div) {
        Ordering::Greater => true,
        Ordering::Equal => !(&q % 2u32).is_zero(),
        Ordering::Less => false,
    };

    if !monter {
        q
    } else if n.is_negative() {
        q - 1u32
    } else {
        q + 1u32
    }
}

/// Racine carrée entière : floor(√n), Newton par valeurs décroissantes.
fn racine_entiere(n: &BigInt) -> BigInt {
    if n.is_zero() {
        return BigInt::zero();
    }

    // point de départ ≥ √n
    let mut y = pow10(nb_chiffres(n).div_ceil(2));

    loop {
        let y_next = (&y + n / &y) >> 1;
        if y_next >= y {
            break;
        }
        y = y_next;
    }

    // ajustement final (floor)
    while &y * &y > *n {
        y -= 1u32;
    }
    while (&y + 1u32) * (&y + 1u32) <= *n {
        y += 1u32;
    }
    y
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q.clone(); // q^(2k+1)
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }
        if k % 2 == 0 {
            sum += &term;
        } else {
            sum -= &term;
        }
        q_pow *= &q2;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: u32) -> BigInt {
    // extra pour amortir les erreurs de troncature
    let extra = 10;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    (BigInt::from(16) * a - BigInt::from(4) * b) / pow10(extra)
}

static PI_CACHE: OnceLock<Mutex<HashMap<u32, BigInt>>> = OnceLock::new();

fn pi_scaled_cached(digits: u32) -> BigInt {
    let m = PI_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    // cache pur : un verrou empoisonné reste utilisable
    let mut guard = m.lock().unwrap_or_else(|e| e.into_inner());

    guard
        .entry(digits)
        .or_insert_with(|| pi_scaled_compute(digits))
        .clone()
}

/// π arrondi à la précision du contexte.
pub fn pi(ctx: Contexte) -> Decimal {
    let places = ctx.precision + 2;
    Decimal::new(pi_scaled_cached(places), -(places as i64)).arrondi(ctx)
}

/* ------------------------ Decimal ------------------------ */

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("nombre invalide")]
pub struct NombreInvalide;

#[derive(Clone, Debug)]
pub struct Decimal {
    mantisse: BigInt,
    exposant: i64,
}

impl Decimal {
    pub fn new(mantisse: BigInt, exposant: i64) -> Self {
        if mantisse.is_zero() {
            return Self::zero();
        }
        Self { mantisse, exposant }
    }

    pub fn zero() -> Self {
        Self {
            mantisse: BigInt::zero(),
            exposant: 0,
        }
    }

    pub fn un() -> Self {
        Self::from(1)
    }

    pub fn demi() -> Self {
        Self::new(BigInt::from(5), -1)
    }

    pub fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    pub fn exposant(&self) -> i64 {
        self.exposant
    }

    pub fn est_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.mantisse.is_negative()
    }

    /// Position du chiffre de tête : 1234 → 3, 0.05 → -2.
    pub fn ajuste(&self) -> i64 {
        nb_chiffres(&self.mantisse) as i64 - 1 + self.exposant
    }

    pub fn abs(&self) -> Self {
        Self::new(self.mantisse.abs(), self.exposant)
    }

    pub fn neg(&self) -> Self {
        Self::new(-&self.mantisse, self.exposant)
    }

    /// Arrondi à la précision du contexte.
    pub fn arrondi(&self, ctx: Contexte) -> Self {
        self.arrondi_significatif(ctx.precision)
    }

    pub fn arrondi_significatif(&self, chiffres: u32) -> Self {
        let d = nb_chiffres(&self.mantisse);
        if d <= chiffres {
            return self.clone();
        }
        let k = d - chiffres;
        let mut m = diviser_arrondi(&self.mantisse, k);
        let mut e = self.exposant + k as i64;

        // 999.. → 1000.. : le dernier chiffre est un zéro exact
        if nb_chiffres(&m) > chiffres {
            m /= 10u32;
            e += 1;
        }
        Self::new(m, e)
    }

    /// Arrondi à `places` décimales (si la valeur est plus fine).
    pub fn quantifie(&self, places: u32) -> Self {
        let cible = -(places as i64);
        if self.exposant >= cible {
            return self.clone();
        }
        let k = (cible - self.exposant) as u32;
        Self::new(diviser_arrondi(&self.mantisse, k), cible)
    }

    /// Retire les zéros finaux de la mantisse.
    pub fn normalise(&self) -> Self {
        if self.est_zero() {
            return Self::zero();
        }
        let dix = BigInt::from(10);
        let mut m = self.mantisse.clone();
        let mut e = self.exposant;
        while (&m % &dix).is_zero() {
            m /= 10u32;
            e += 1;
        }
        Self { mantisse: m, exposant: e }
    }

    /* ------------------------ Arithmétique arrondie ------------------------ */

    pub fn add(&self, autre: &Decimal, ctx: Contexte) -> Decimal {
        if self.est_zero() {
            return autre.arrondi(ctx);
        }
        if autre.est_zero() {
            return self.arrondi(ctx);
        }

        // terme négligeable : remplacé par un “reste collant” au lieu d’aligner des
        // exposants très éloignés
        let marge = ctx.precision as i64 + 3;
        let (a, b) = if self.ajuste() - autre.ajuste() > marge {
            (self.clone(), autre.collant(self.ajuste() - marge - 1))
        } else if autre.ajuste() - self.ajuste() > marge {
            (self.collant(autre.ajuste() - marge - 1), autre.clone())
        } else {
            (self.clone(), autre.clone())
        };

        let e = a.exposant.min(b.exposant);
        let ma = a.mantisse * pow10((a.exposant - e) as u32);
        let mb = b.mantisse * pow10((b.exposant - e) as u32);
        Decimal::new(ma + mb, e).arrondi(ctx)
    }

    /// ±1 à la position `exposant` (même signe que self).
    fn collant(&self, exposant: i64) -> Decimal {
        let un = if self.est_negatif() {
            -BigInt::one()
        } else {
            BigInt::one()
        };
        Decimal::new(un, exposant)
    }

    pub fn sub(&self, autre: &Decimal, ctx: Contexte) -> Decimal {
        self.add(&autre.neg(), ctx)
    }

    pub fn mul(&self, autre: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
        if self.est_zero() || autre.est_zero() {
            return Ok(Decimal::zero());
        }
        let e = exposant_borne(self.exposant.checked_add(autre.exposant))?;
        Ok(Decimal::new(&self.mantisse * &autre.mantisse, e).arrondi(ctx))
    }

    pub fn div(&self, autre: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
        if autre.est_zero() {
            return Err(ErreurArith::DivisionParZero);
        }
        if self.est_zero() {
            return Ok(Decimal::zero());
        }

        // assez de chiffres pour precision + 1, puis un chiffre “collant” si reste
        let decalage = (ctx.precision as i64 + 2 + nb_chiffres(&autre.mantisse) as i64
            - nb_chiffres(&self.mantisse) as i64)
            .max(0) as u32;
        let num = &self.mantisse * pow10(decalage);
        let q = &num / &autre.mantisse;
        let r = &num % &autre.mantisse;

        let mut q = q * 10u32;
        if !r.is_zero() {
            if self.est_negatif() != autre.est_negatif() {
                q -= 1u32;
            } else {
                q += 1u32;
            }
        }

        let e = exposant_borne(
            self.exposant
                .checked_sub(autre.exposant)
                .and_then(|e| e.checked_sub(decalage as i64 + 1)),
        )?;
        Ok(Decimal::new(q, e).arrondi(ctx))
    }

    /// Reste tronqué (signe du dividende).
    pub fn reste(&self, autre: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
        if autre.est_zero() {
            return Err(ErreurArith::DivisionParZero);
        }
        if (self.exposant - autre.exposant).abs() > 10_000 {
            return Err(ErreurArith::Depassement("modulo"));
        }
        let e = self.exposant.min(autre.exposant);
        let a = &self.mantisse * pow10((self.exposant - e) as u32);
        let b = &autre.mantisse * pow10((autre.exposant - e) as u32);
        Ok(Decimal::new(a % b, e).arrondi(ctx))
    }

    /// Racine carrée arrondie (Newton entier sur la mantisse scalée).
    pub fn racine(&self, ctx: Contexte) -> ResultatArith<Decimal> {
        if self.est_negatif() {
            return Err(ErreurArith::Domaine("racine d’un nombre négatif".into()));
        }
        if self.est_zero() {
            return Ok(Decimal::zero());
        }

        let w = ctx.precision as i64 + 2;
        let mut decalage = (2 * w - nb_chiffres(&self.mantisse) as i64 + 2).max(0);
        if (self.exposant - decalage) % 2 != 0 {
            decalage += 1;
        }

        let n = &self.mantisse * pow10(decalage as u32);
        let r = racine_entiere(&n);
        let exacte = &r * &r == n;

        let mut r = r * 10u32;
        if !exacte {
            r += 1u32;
        }
        let e = (self.exposant - decalage) / 2 - 1;
        Ok(Decimal::new(r, e).arrondi(ctx))
    }

    /* ------------------------ Conversions ------------------------ */

    pub fn est_entier(&self) -> bool {
        if self.exposant >= 0 || self.est_zero() {
            return true;
        }
        let k = (-self.exposant) as u32;
        if k > nb_chiffres(&self.mantisse) {
            return false;
        }
        (&self.mantisse % pow10(k)).is_zero()
    }

    /// Valeur entière exacte (None si partie fractionnaire ou exposant démesuré).
    pub fn vers_bigint(&self) -> Option<BigInt> {
        if !self.est_entier() {
            return None;
        }
        if self.exposant >= 0 {
            if self.exposant > 100_000 {
                return None;
            }
            return Some(&self.mantisse * pow10(self.exposant as u32));
        }
        Some(&self.mantisse / pow10((-self.exposant) as u32))
    }

    pub fn vers_i64(&self) -> Option<i64> {
        if self.ajuste() > 18 {
            return None;
        }
        self.vers_bigint()?.to_i64()
    }

    /// Approximation f64 (graine pour Newton, jamais un résultat).
    pub fn vers_f64(&self) -> f64 {
        let (tete, e) = self.tete();
        tete * 10f64.powi(e.clamp(-400, 400) as i32)
    }

    /// ln(|x|) approché en f64, sans débordement pour les grands exposants.
    pub fn ln_approx(&self) -> f64 {
        let (tete, e) = self.tete();
        tete.abs().ln() + e as f64 * std::f64::consts::LN_10
    }

    /// (17 chiffres de tête en f64, exposant associé)
    fn tete(&self) -> (f64, i64) {
        let d = nb_chiffres(&self.mantisse);
        let k = d.saturating_sub(17);
        let m = &self.mantisse / pow10(k);
        (m.to_f64().unwrap_or(0.0), self.exposant + k as i64)
    }

    pub fn depuis_f64(x: f64) -> Decimal {
        if !x.is_finite() {
            return Decimal::zero();
        }
        let s = format!("{x:.17e}");
        let (m, e) = s.split_once('e').unwrap_or((s.as_str(), "0"));
        match (m.parse::<Decimal>(), e.parse::<i64>()) {
            (Ok(m), Ok(e)) => Decimal::new(m.mantisse, m.exposant + e),
            _ => Decimal::zero(),
        }
    }

    pub fn vers_rationnel(&self) -> BigRational {
        if self.exposant >= 0 {
            BigRational::from_integer(&self.mantisse * pow10(self.exposant as u32))
        } else {
            BigRational::new(self.mantisse.clone(), pow10((-self.exposant) as u32))
        }
    }

    /// Écriture sans exposant : 1234.5, 0.00012, -70
    pub fn texte_plat(&self) -> String {
        let chiffres = self.mantisse.magnitude().to_str_radix(10);
        let signe = if self.est_negatif() { "-" } else { "" };

        if self.exposant >= 0 {
            let zeros = "0".repeat(self.exposant as usize);
            return format!("{signe}{chiffres}{zeros}");
        }

        let k = (-self.exposant) as usize;
        if chiffres.len() > k {
            let (ent, frac) = chiffres.split_at(chiffres.len() - k);
            format!("{signe}{ent}.{frac}")
        } else {
            let zeros = "0".repeat(k - chiffres.len());
            format!("{signe}0.{zeros}{chiffres}")
        }
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::new(BigInt::from(n), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::new(n, 0)
    }
}

/// Littéral : chiffres, au plus un point, signe '-' optionnel.
impl FromStr for Decimal {
    type Err = NombreInvalide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negatif, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };

        let mut chiffres = String::with_capacity(corps.len());
        let mut point = false;
        let mut fraction: i64 = 0;

        for c in corps.chars() {
            if c.is_ascii_digit() {
                chiffres.push(c);
                if point {
                    fraction += 1;
                }
            } else if c == '.' && !point {
                point = true;
            } else {
                return Err(NombreInvalide);
            }
        }

        let m = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or(NombreInvalide)?;
        Ok(Decimal::new(if negatif { -m } else { m }, -fraction))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let signe = |d: &Decimal| -> i8 {
            if d.est_zero() {
                0
            } else if d.est_negatif() {
                -1
            } else {
                1
            }
        };

        let (sa, sb) = (signe(self), signe(other));
        if sa != sb || sa == 0 {
            return sa.cmp(&sb);
        }

        let (aa, ab) = (self.ajuste(), other.ajuste());
        if aa != ab {
            let ord = aa.cmp(&ab);
            return if sa > 0 { ord } else { ord.reverse() };
        }

        // même ordre de grandeur : l’écart d’exposants est borné par le nombre de chiffres
        let e = self.exposant.min(other.exposant);
        let a = &self.mantisse * pow10((self.exposant - e) as u32);
        let b = &other.mantisse * pow10((other.exposant - e) as u32);
        a.cmp(&b)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalise().texte_plat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap_or_else(|_| panic!("littéral invalide: {s:?}"))
    }

    const P28: Contexte = Contexte { precision: 28 };

    #[test]
    fn lecture_et_ecriture() {
        assert_eq!(d("12.50").to_string(), "12.5");
        assert_eq!(d(".5").to_string(), "0.5");
        assert_eq!(d("7.").to_string(), "7");
        assert_eq!(d("0.000120").to_string(), "0.00012");
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!(".".parse::<Decimal>().is_err());
    }

    #[test]
    fn exposants_bornes() {
        let grand = Decimal::new(BigInt::one(), EXPOSANT_MAX);
        let petit = Decimal::new(BigInt::one(), -EXPOSANT_MAX);
        assert_eq!(grand.mul(&grand, P28), Err(ErreurArith::Depassement("exposant")));
        assert_eq!(petit.mul(&grand, P28), Ok(Decimal::un()));
        assert_eq!(petit.div(&grand, P28), Err(ErreurArith::Depassement("exposant")));
    }

    #[test]
    fn egalite_independante_de_l_exposant() {
        assert_eq!(d("2.000"), d("2"));
        assert!(d("-3") < d("-2.5"));
        assert!(d("0.001") < d("1000"));
    }

    #[test]
    fn arrondi_demi_pair() {
        assert_eq!(d("2.5").arrondi_significatif(1), d("2"));
        assert_eq!(d("3.5").arrondi_significatif(1), d("4"));
        assert_eq!(d("-2.51").arrondi_significatif(1), d("-3"));
        assert_eq!(d("9.99").arrondi_significatif(2), d("10"));
    }

    #[test]
    fn division_arrondie() {
        let tiers = Decimal::un().div(&Decimal::from(3), P28).unwrap();
        assert_eq!(tiers.to_string(), format!("0.{}", "3".repeat(28)));

        let deux_tiers = Decimal::from(2).div(&Decimal::from(3), Contexte::nouveau(5)).unwrap();
        assert_eq!(deux_tiers, d("0.66667"));

        assert_eq!(
            Decimal::un().div(&Decimal::zero(), P28),
            Err(ErreurArith::DivisionParZero)
        );
    }

    #[test]
    fn addition_termes_eloignes() {
        let grand = d("1");
        let minuscule = Decimal::new(BigInt::from(1), -100);
        assert_eq!(grand.add(&minuscule, P28), grand);
        assert_eq!(grand.sub(&minuscule, P28), grand);

        // à 3 chiffres, le terme collant ne fait pas basculer un arrondi exact
        let p3 = Contexte::nouveau(3);
        assert_eq!(d("1.25").add(&minuscule, p3), d("1.25"));
    }

    #[test]
    fn racine_exacte_et_irrationnelle() {
        assert_eq!(d("4").racine(P28).unwrap(), d("2"));
        assert_eq!(d("0.0625").racine(P28).unwrap(), d("0.25"));
        let r2 = d("2").racine(Contexte::nouveau(20)).unwrap();
        assert_eq!(r2.to_string(), "1.4142135623730950488");
        assert!(d("-1").racine(P28).is_err());
    }

    #[test]
    fn pi_machin() {
        assert_eq!(pi(Contexte::nouveau(20)).to_string(), "3.1415926535897932385");
    }

    #[test]
    fn reste_tronque() {
        assert_eq!(d("7").reste(&d("3"), P28).unwrap(), d("1"));
        assert_eq!(d("-7").reste(&d("3"), P28).unwrap(), d("-1"));
        assert_eq!(d("5.5").reste(&d("2"), P28).unwrap(), d("1.5"));
    }

    #[test]
    fn conversions_entieres() {
        assert_eq!(d("120").vers_i64(), Some(120));
        assert_eq!(d("1.5").vers_i64(), None);
        assert!(d("3.000").est_entier());
        assert_eq!(d("0.25").vers_rationnel(), BigRational::new(1.into(), 4.into()));
    }
}
