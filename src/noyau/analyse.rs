// src/noyau/analyse.rs
//
// Fonctions transcendantes sur Decimal
// ------------------------------------
// - séries de Taylor sommées à précision élargie jusqu’à ce que la somme ne bouge plus
// - le résultat est arrondi à la précision demandée en sortie
// - garde-fous : nombre de termes borné, exposants démesurés refusés

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::decimal::{pi, Contexte, Decimal};
use super::erreur::{ErreurArith, ResultatArith};

/// Nombre maximal de termes d’une série (ne devrait jamais être atteint).
const LIMITE_SERIE: i64 = 20_000;

/// Itérations maximales de Halley pour ln.
const LIMITE_NEWTON: usize = 64;

/// n! au-delà de cette borne est refusé.
pub const LIMITE_FACTORIELLE: i64 = 10_000;

/// Exposant entier calculé par carrés successifs jusqu’à cette borne.
const LIMITE_PUISSANCE_ENTIERE: u64 = 1_000_000;

/// Σ termes tant que la somme bouge, à partir de `premier`.
/// `suivant(terme, rang)` fabrique le terme suivant.
fn sommer<F>(premier: Decimal, ctx: Contexte, mut suivant: F) -> ResultatArith<Decimal>
where
    F: FnMut(&Decimal, i64) -> ResultatArith<Decimal>,
{
    let mut somme = premier.clone();
    let mut terme = premier;
    for rang in 1..LIMITE_SERIE {
        terme = suivant(&terme, rang)?;
        let nouvelle = somme.add(&terme, ctx);
        if nouvelle == somme {
            return Ok(somme);
        }
        somme = nouvelle;
    }
    Err(ErreurArith::Depassement("série non convergente"))
}

/* ------------------------ exp / ln ------------------------ */

pub fn exp(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    if x.est_zero() {
        return Ok(Decimal::un());
    }
    if x.ajuste() > 8 {
        return Err(ErreurArith::Depassement("exponentielle"));
    }

    // réduction : r = x / 2^k avec |r| < 1/2, puis k mises au carré
    let xf = x.vers_f64().abs();
    let k: u32 = if xf < 0.5 {
        0
    } else {
        (xf.log2().ceil() as i64 + 1).max(0) as u32
    };
    let travail = ctx.elargi(10 + k);

    let r = x.div(&Decimal::from(BigInt::from(2).pow(k)), travail)?;
    let mut somme = sommer(Decimal::un(), travail, |terme, rang| {
        terme.mul(&r, travail)?.div(&Decimal::from(rang), travail)
    })?;

    for _ in 0..k {
        somme = somme.mul(&somme, travail)?;
    }
    Ok(somme.arrondi(ctx))
}

pub fn ln(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    if x.est_negatif() || x.est_zero() {
        return Err(ErreurArith::Domaine(
            "logarithme d’un nombre non positif".into(),
        ));
    }
    if *x == Decimal::un() {
        return Ok(Decimal::zero());
    }

    let travail = ctx.elargi(10);
    let deux = Decimal::from(2);

    // Halley : y ← y + 2(x − eʸ)/(x + eʸ), graine f64
    let mut y = Decimal::depuis_f64(x.ln_approx());
    for _ in 0..LIMITE_NEWTON {
        let ey = exp(&y, travail)?;
        let delta = deux
            .mul(&x.sub(&ey, travail), travail)?
            .div(&x.add(&ey, travail), travail)?;
        y = y.add(&delta, travail);

        if delta.est_zero() || delta.ajuste() < y.ajuste() - travail.precision as i64 {
            break;
        }
    }
    Ok(y.arrondi(ctx))
}

/// log_b(x) = ln(x) / ln(b)
pub fn log_base(x: &Decimal, base: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let travail = ctx.elargi(5);
    let denom = ln(base, travail)?;
    if denom.est_zero() {
        return Err(ErreurArith::Domaine("logarithme de base 1".into()));
    }
    Ok(ln(x, travail)?.div(&denom, travail)?.arrondi(ctx))
}

/* ------------------------ puissance ------------------------ */

/// a^b : exposant entier par carrés, 0.5 par racine, sinon exp(b·ln a).
pub fn puissance(a: &Decimal, b: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    if b.est_zero() {
        return Ok(Decimal::un());
    }
    if let Some(n) = b.vers_i64().filter(|n| n.unsigned_abs() <= LIMITE_PUISSANCE_ENTIERE) {
        return puissance_entiere(a, n, ctx);
    }
    if *b == Decimal::demi() {
        return a.racine(ctx);
    }
    if a.est_zero() {
        return if b.est_negatif() {
            Err(ErreurArith::DivisionParZero)
        } else {
            Ok(Decimal::zero())
        };
    }

    let travail = ctx.elargi(10);

    if a.est_negatif() {
        // exposant entier démesuré : signe selon la parité
        let Some(n) = b.vers_bigint() else {
            return Err(ErreurArith::Domaine(
                "puissance non entière d’un nombre négatif".into(),
            ));
        };
        let r = exp(&b.mul(&ln(&a.abs(), travail)?, travail)?, travail)?;
        let impair = !(n % 2u32).is_zero();
        return Ok(if impair { r.neg() } else { r }.arrondi(ctx));
    }

    Ok(exp(&b.mul(&ln(a, travail)?, travail)?, travail)?.arrondi(ctx))
}

fn puissance_entiere(a: &Decimal, n: i64, ctx: Contexte) -> ResultatArith<Decimal> {
    let mut e = n.unsigned_abs();
    let travail = ctx.elargi(e.to_string().len() as u32 + 2);

    let mut base = a.clone();
    let mut acc = Decimal::un();
    while e > 0 {
        if e & 1 == 1 {
            acc = acc.mul(&base, travail)?;
        }
        e >>= 1;
        if e > 0 {
            base = base.mul(&base, travail)?;
        }
    }

    if n < 0 {
        Decimal::un().div(&acc, ctx)
    } else {
        Ok(acc.arrondi(ctx))
    }
}

/* ------------------------ factorielle ------------------------ */

pub fn factorielle(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let n = match x.vers_i64() {
        Some(n) if n >= 0 && x.est_entier() => n,
        _ => {
            return Err(ErreurArith::Domaine(format!(
                "factorielle de {x} (entier positif attendu)"
            )))
        }
    };
    if n > LIMITE_FACTORIELLE {
        return Err(ErreurArith::Depassement("factorielle"));
    }

    let mut acc = BigInt::one();
    for i in 2..=n {
        acc *= i;
    }
    Ok(Decimal::from(acc).arrondi(ctx))
}

/* ------------------------ trigonométrie ------------------------ */

/// x ramené dans [-π, π] (x − 2π·round(x / 2π)).
fn reduire_angle(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    if x.ajuste() < 0 {
        return Ok(x.clone());
    }
    if x.ajuste() > 1000 {
        return Err(ErreurArith::Depassement("angle"));
    }

    // chiffres de garde : autant que la partie entière de x
    let travail = ctx.elargi(x.ajuste() as u32 + 2);
    let deux_pi = pi(travail).mul(&Decimal::from(2), travail)?;
    let tours = x.div(&deux_pi, travail)?.quantifie(0);
    Ok(x.sub(&tours.mul(&deux_pi, travail)?, travail).arrondi(ctx))
}

pub fn sin(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let travail = ctx.elargi(4);
    let x = reduire_angle(x, travail)?;
    let x2 = x.mul(&x, travail)?;

    let somme = sommer(x.clone(), travail, |terme, rang| {
        let i = 2 * rang + 1;
        Ok(terme
            .mul(&x2, travail)?
            .div(&Decimal::from(i * (i - 1)), travail)?
            .neg())
    })?;
    Ok(somme.arrondi(ctx))
}

pub fn cos(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let travail = ctx.elargi(4);
    let x = reduire_angle(x, travail)?;
    let x2 = x.mul(&x, travail)?;

    let somme = sommer(Decimal::un(), travail, |terme, rang| {
        let i = 2 * rang;
        Ok(terme
            .mul(&x2, travail)?
            .div(&Decimal::from(i * (i - 1)), travail)?
            .neg())
    })?;
    Ok(somme.arrondi(ctx))
}

pub fn tan(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let travail = ctx.elargi(4);
    let c = cos(x, travail)?;
    sin(x, travail)?.div(&c, ctx)
}

pub fn atan(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }

    let travail = ctx.elargi(10);
    let un = Decimal::un();

    let mut a = x.abs();
    let inverse = a > un;
    if inverse {
        a = un.div(&a, travail)?;
    }

    // atan(a) = 2·atan(a / (1 + √(1 + a²))) jusqu’à a ≤ 0.1
    let dixieme = Decimal::new(BigInt::one(), -1);
    let mut doublements = 0u32;
    while a > dixieme {
        let s = un.add(&a.mul(&a, travail)?, travail).racine(travail)?;
        a = a.div(&un.add(&s, travail), travail)?;
        doublements += 1;
    }

    let a2 = a.mul(&a, travail)?;
    let mut puissance_a = a.clone();
    let mut somme = sommer(a.clone(), travail, |_, rang| {
        puissance_a = puissance_a.mul(&a2, travail)?.neg();
        puissance_a.div(&Decimal::from(2 * rang + 1), travail)
    })?;

    somme = somme.mul(&Decimal::from(BigInt::from(2).pow(doublements)), travail)?;
    if inverse {
        let demi_pi = pi(travail).div(&Decimal::from(2), travail)?;
        somme = demi_pi.sub(&somme, travail);
    }
    if x.est_negatif() {
        somme = somme.neg();
    }
    Ok(somme.arrondi(ctx))
}

pub fn asin(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let un = Decimal::un();
    let a = x.abs();
    if a > un {
        return Err(ErreurArith::Domaine(format!("asin({x})")));
    }

    let travail = ctx.elargi(10);
    if a == un {
        let demi_pi = pi(travail).div(&Decimal::from(2), travail)?;
        let r = if x.est_negatif() { demi_pi.neg() } else { demi_pi };
        return Ok(r.arrondi(ctx));
    }

    let c = un.sub(&x.mul(x, travail)?, travail).racine(travail)?;
    atan(&x.div(&c, travail)?, ctx)
}

pub fn acos(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    let travail = ctx.elargi(10);
    let demi_pi = pi(travail).div(&Decimal::from(2), travail)?;
    Ok(demi_pi.sub(&asin(x, travail)?, travail).arrondi(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    const P20: Contexte = Contexte { precision: 20 };

    #[test]
    fn exponentielle_et_logarithme() {
        assert_eq!(exp(&d("1"), P20).unwrap().to_string(), "2.7182818284590452354");
        assert_eq!(ln(&d("10"), P20).unwrap().to_string(), "2.302585092994045684");
        assert_eq!(ln(&d("1"), P20).unwrap(), Decimal::zero());
        assert!(ln(&d("0"), P20).is_err());
        assert!(ln(&d("-2"), P20).is_err());
    }

    #[test]
    fn puissances() {
        assert_eq!(puissance(&d("2"), &d("10"), P20).unwrap(), d("1024"));
        assert_eq!(puissance(&d("2"), &d("-2"), P20).unwrap(), d("0.25"));
        assert_eq!(puissance(&d("-2"), &d("3"), P20).unwrap(), d("-8"));
        assert_eq!(puissance(&d("9"), &d("0.5"), P20).unwrap(), d("3"));
        assert_eq!(
            puissance(&d("0"), &d("-1"), P20),
            Err(ErreurArith::DivisionParZero)
        );
        assert!(puissance(&d("-8"), &d("0.5"), P20).is_err());

        // exposant entier extrême : erreur, jamais de débordement de i64
        assert_eq!(
            puissance(&d("2"), &Decimal::from(i64::MIN), P20),
            Err(ErreurArith::Depassement("exponentielle"))
        );

        let r = puissance(&d("2"), &d("0.25"), P20).unwrap();
        assert_eq!(r.to_string(), "1.1892071150027210667");
    }

    #[test]
    fn trigonometrie() {
        let p30 = Contexte::nouveau(30);
        assert_eq!(sin(&d("0"), P20).unwrap(), Decimal::zero());
        assert_eq!(cos(&d("0"), P20).unwrap(), Decimal::un());
        assert_eq!(sin(&d("1"), P20).unwrap().to_string(), "0.84147098480789650665");

        // sin(π) à 30 chiffres : résidu minuscule, pas exactement 0
        let s = sin(&pi(p30), p30).unwrap();
        assert!(s.abs() < d("0.0000000000000000000000001"));

        // réduction d’angle
        let a = sin(&d("100"), P20).unwrap();
        assert_eq!(a.to_string(), "-0.50636564110975879366");
    }

    #[test]
    fn reciproques() {
        let quart_pi = pi(P20).div(&d("4"), P20).unwrap();
        assert_eq!(atan(&d("1"), P20).unwrap(), quart_pi);
        assert_eq!(atan(&d("-1"), P20).unwrap(), quart_pi.neg());

        let demi_pi = pi(P20).div(&d("2"), P20).unwrap();
        assert_eq!(asin(&d("1"), P20).unwrap(), demi_pi);
        assert_eq!(acos(&d("1"), P20).unwrap(), Decimal::zero());
        assert_eq!(asin(&d("0.5"), P20).unwrap().to_string(), "0.52359877559829887308");
        assert!(asin(&d("1.5"), P20).is_err());
    }

    #[test]
    fn factorielles() {
        assert_eq!(factorielle(&d("5"), P20).unwrap(), d("120"));
        assert_eq!(factorielle(&d("0"), P20).unwrap(), d("1"));
        assert!(factorielle(&d("2.5"), P20).is_err());
        assert!(factorielle(&d("-1"), P20).is_err());
    }
}
