use ndarray_rand::rand as rand;
use ndarray_rand::rand_distr as rand_distr;
use rand_distr::{Uniform,StandardNormal};
use rand::{SeedableRng,Rng,rngs::StdRng};
use crate::math::Real;

/// Random source shared by the samplers.  Uniform draws are in [0,1)
/// before rescaling.
pub struct Random {
    pub rng:StdRng,
    dist:Uniform<Real>
}

impl Random {
    fn with_rng(rng:StdRng)->Self {
        let dist : Uniform<Real> = Uniform::new(0.0,1.0);
        Random{ rng, dist }
    }

    pub fn number(&mut self,x0:Real,x1:Real)->Real {
        x0+(x1-x0)*self.rng.sample(self.dist)
    }

    pub fn normal(&mut self)->Real {
	self.rng.sample(StandardNormal)
    }

    pub fn new()->Self {
	Self::with_rng(SeedableRng::from_entropy())
    }

    /// Same seed, same sequence of draws.
    pub fn seeded(seed:u64)->Self {
	Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Random {
    fn default()->Self {
	Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_range() {
	let mut rng = Random::seeded(7);
	for _ in 0..10000 {
	    let u = rng.number(0.0,1.0);
	    assert!((0.0..1.0).contains(&u));
	    let v = rng.number(-2.0,3.0);
	    assert!((-2.0..3.0).contains(&v));
	}
    }

    #[test]
    fn test_seeded_repeats() {
	let mut a = Random::seeded(1234);
	let mut b = Random::seeded(1234);
	for _ in 0..100 {
	    assert_eq!(a.normal(),b.normal());
	    assert_eq!(a.number(0.0,1.0),b.number(0.0,1.0));
	}
    }

    #[test]
    fn test_normal_moments() {
	let mut rng = Random::seeded(99);
	let n = 100000;
	let mut s1 = 0.0;
	let mut s2 = 0.0;
	for _ in 0..n {
	    let x = rng.normal();
	    s1 += x;
	    s2 += x*x;
	}
	let mean = s1/n as Real;
	let var = s2/n as Real - mean*mean;
	assert!(mean.abs() < 0.02);
	assert!((var - 1.0).abs() < 0.03);
    }
}
