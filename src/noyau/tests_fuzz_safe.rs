//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant de pile : une RPN laisse exactement une valeur, sinon erreur de compilation
//!   (arités mélangées au hasard)

use std::time::{Duration, Instant};

use super::decimal::{Contexte, Decimal};
use super::erreur::{Categorie, ErreurCalcul};
use super::eval::Calculatrice;
use super::jetons::Jeton;
use super::registre::Registre;
use super::reglages::Reglages;
use super::rpn::{evaluer, reponse_unique};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const ATOMES: &[&str] = &["0", "1", "2", "3", "0.5", "pi", "x", "km", "s", "\"a\"", "deg"];
const OPERATEURS: &[&str] = &["+", "-", "*", ":", ",", " "];
const FONCTIONS: &[&str] = &["sin", "cos", "sqrt", "ln", "dist", "-"];

fn gen_atom(rng: &mut Rng) -> String {
    ATOMES[rng.pick(ATOMES.len() as u32) as usize].to_string()
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(7) {
        0 => gen_atom(rng),
        1 | 2 => {
            let op = OPERATEURS[rng.pick(OPERATEURS.len() as u32) as usize];
            format!("({} {op} {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1))
        }
        3 => {
            let f = FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize];
            format!("{f} ({})", gen_expr(rng, depth - 1))
        }
        4 => format!("({})^2", gen_expr(rng, depth - 1)),
        5 => format!("[{}]", gen_expr(rng, depth - 1)),
        _ => {
            if rng.coin() {
                format!("{}!", gen_atom(rng))
            } else {
                // parenthèse volontairement orpheline
                format!("({}", gen_expr(rng, depth - 1))
            }
        }
    }
}

fn sortie(c: &mut Calculatrice, expr: &str) -> (bool, String) {
    c.calculer(expr);
    c.reponse()
}

fn calculatrice() -> Calculatrice {
    let mut c = Calculatrice::default();
    c.calculer("x = 2");
    c
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_erreurs_typees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut a = calculatrice();
    let mut b = calculatrice();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let (erreur, texte) = sortie(&mut a, &expr);

        // Même entrée => même sortie (déterminisme)
        assert_eq!((erreur, texte.clone()), sortie(&mut b, &expr), "expr={expr:?}");

        if erreur {
            assert!(!texte.is_empty(), "message vide: expr={expr:?}");
            assert!(a.erreur().is_some());
            seen_err += 1;
        } else {
            seen_ok += 1;
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 10, "trop peu d’erreurs: {seen_err}");
}

#[test]
fn fuzz_safe_arites_melangees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let registre = Registre::depuis_reglages(&Reglages::default());
    let ctx = Contexte::nouveau(28);

    // arités 0, 1 et 2
    let mut pool: Vec<Jeton> = vec![
        Jeton::nombre("1", Decimal::un()),
        Jeton::nombre("2", Decimal::from(2)),
    ];
    for nom in ["+", "*", ",", " -", "!", "sqrt"] {
        if let Some(j) = registre.obtenir(nom) {
            pool.push(j.clone());
        }
    }
    assert_eq!(pool.len(), 8);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut vus = [0usize; 3];

    for _ in 0..400 {
        budget(t0, max);

        let n = 1 + rng.pick(10) as usize;
        let rpn: Vec<Jeton> = (0..n)
            .map(|_| pool[rng.pick(pool.len() as u32) as usize].clone())
            .collect();

        // profondeur simulée
        let mut profondeur: Option<usize> = Some(0);
        for j in &rpn {
            profondeur = profondeur.and_then(|p| (p >= j.arite()).then(|| p - j.arite() + 1));
        }

        let resultat = evaluer(&rpn, ctx).and_then(reponse_unique);
        match (profondeur, resultat) {
            (None, Err(ErreurCalcul::OperandesManquantes(_))) => vus[0] += 1,
            (Some(p), Err(ErreurCalcul::PileIncorrecte(q))) if p != 1 => {
                assert_eq!(p, q);
                vus[1] += 1;
            }
            (Some(1), Ok(_)) => vus[2] += 1,
            (Some(1), Err(e)) => assert_eq!(e.categorie(), Categorie::Arithmetique),
            (p, r) => panic!("profondeur={p:?} résultat={r:?}"),
        }
    }

    assert!(vus.iter().all(|&v| v > 0), "cas non couverts: {vus:?}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("0.5", 800);
    budget(t0, max);

    let mut c = Calculatrice::default();
    assert_eq!(sortie(&mut c, &expr), (false, "400".to_string()));
    budget(t0, max);
}
