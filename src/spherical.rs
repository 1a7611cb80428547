use std::cell::RefCell;

use crate::common::*;
use crate::math::*;
use crate::math_random::Random;

/// How a uniform direction (a point on the unit sphere) is drawn.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum Direction {
    /// Normalized triple of standard normals
    Normal,
    /// Uniform height and uniform azimuth
    Archimedes
}

impl Default for Direction {
    fn default()->Self { Direction::Normal }
}

impl std::str::FromStr for Direction {
    type Err = Box<dyn Error>;
    fn from_str(u:&str)->Res<Self> {
	match u {
	    "normal" => Ok(Direction::Normal),
	    "archimedes" => Ok(Direction::Archimedes),
	    _ => Err(error(&format!("Unknown direction method {:?}",u)))
	}
    }
}

/// Whether points land on the surface or fill the ball.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum Mode {
    Surface,
    Volume
}

impl Default for Mode {
    fn default()->Self { Mode::Surface }
}

impl std::str::FromStr for Mode {
    type Err = Box<dyn Error>;
    fn from_str(u:&str)->Res<Self> {
	match u {
	    "surface" => Ok(Mode::Surface),
	    "volume" => Ok(Mode::Volume),
	    _ => Err(error(&format!("Unknown sampling mode {:?}",u)))
	}
    }
}

/// Normalizes the first draw of nonzero length.
fn normalize_nonzero<F:FnMut()->Real3>(mut draw:F)->Real3 {
    loop {
	let v = draw();
	let n = v.norm2();
	// All three draws were exactly zero; draw again rather than divide
	if n > 0.0 {
	    return v/n;
	}
    }
}

fn sample_normal(rng:&mut Random)->Real3 {
    normalize_nonzero(|| r3(rng.normal(),rng.normal(),rng.normal()))
}

fn sample_archimedes(rng:&mut Random)->Real3 {
    let z = rng.number(-1.0,1.0);
    let theta = 2.0*PI*rng.number(0.0,1.0);
    let rxy = sqrt(max(0.0,1.0 - sq(z)));
    r3(rxy*cos(theta),rxy*sin(theta),z)
}

pub fn sample_direction(rng:&mut Random,direction:Direction)->Real3 {
    match direction {
	Direction::Normal => sample_normal(rng),
	Direction::Archimedes => sample_archimedes(rng)
    }
}

/// Cube root of a uniform draw, so that P(r <= t) = t^3.
pub fn sample_radius(rng:&mut Random)->Real {
    cbrt(rng.number(0.0,1.0))
}

pub fn sample_ball(rng:&mut Random,direction:Direction)->Real3 {
    let u = sample_direction(rng,direction);
    let r = sample_radius(rng);
    r*u
}

/// Uniformly distributed point on the surface of the unit sphere.
pub fn point_on_sphere(rng:&mut Random)->Real3 {
    sample_direction(rng,Direction::Normal)
}

/// Uniformly distributed point in the unit ball, by volume.
pub fn point_inside_sphere(rng:&mut Random)->Real3 {
    sample_ball(rng,Direction::Normal)
}

thread_local! {
    static RNG : RefCell<Random> = RefCell::new(Random::new());
}

/// Like [`point_on_sphere`], drawing from a per-thread entropy-seeded generator.
pub fn random_point_on_sphere()->(Real,Real,Real) {
    RNG.with(|rng| point_on_sphere(&mut rng.borrow_mut())).into()
}

/// Like [`point_inside_sphere`], drawing from a per-thread entropy-seeded generator.
pub fn random_point_inside_sphere()->(Real,Real,Real) {
    RNG.with(|rng| point_inside_sphere(&mut rng.borrow_mut())).into()
}

/// A sphere of arbitrary center and radius.
#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
pub struct Sphere {
    pub center:Real3,
    pub radius:Real,
    pub direction:Direction
}

impl Default for Sphere {
    fn default()->Self {
	Self { center:Real3::zero(),radius:1.0,direction:Direction::Normal }
    }
}

impl Sphere {
    pub fn new(center:Real3,radius:Real)->Res<Self> {
	if !(radius.is_finite() && radius > 0.0) {
	    return Err(error(&format!("Invalid sphere radius {}",radius)));
	}
	if !center.is_finite() {
	    return Err(error(&format!("Invalid sphere center {:?}",center)));
	}
	Ok(Self { center,radius,direction:Direction::Normal })
    }

    pub fn with_direction(self,direction:Direction)->Self {
	Self { direction,..self }
    }

    pub fn on_surface(&self,rng:&mut Random)->Real3 {
	self.center + self.radius*sample_direction(rng,self.direction)
    }

    pub fn inside(&self,rng:&mut Random)->Real3 {
	self.center + self.radius*sample_ball(rng,self.direction)
    }

    pub fn sample(&self,rng:&mut Random,mode:Mode)->Real3 {
	match mode {
	    Mode::Surface => self.on_surface(rng),
	    Mode::Volume => self.inside(rng)
	}
    }

    /// Maps a point back into unit-sphere coordinates.
    pub fn normalize(&self,p:Real3)->Real3 {
	(p - self.center)/self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL:Real = 1e-9;

    #[test]
    fn test_surface_norm() {
	let mut rng = Random::seeded(1);
	for direction in [Direction::Normal,Direction::Archimedes] {
	    for _ in 0..10000 {
		let p = sample_direction(&mut rng,direction);
		assert!(abs(p.norm2sq() - 1.0) < TOL,"{:?} off the sphere",p);
	    }
	}
    }

    #[test]
    fn test_volume_bound() {
	let mut rng = Random::seeded(2);
	for direction in [Direction::Normal,Direction::Archimedes] {
	    for _ in 0..10000 {
		let p = sample_ball(&mut rng,direction);
		assert!(p.norm2sq() <= 1.0 + TOL,"{:?} outside the ball",p);
	    }
	}
    }

    #[test]
    fn test_zero_draw_is_redrawn() {
	let mut draws = vec![Real3::zero(),Real3::zero(),r3(0.0,3.0,4.0)].into_iter();
	let mut calls = 0;
	let p = normalize_nonzero(|| {
	    calls += 1;
	    draws.next().unwrap()
	});
	assert_eq!(calls,3);
	assert!(p.is_finite());
	assert_close!(p.norm2(),1.0,TOL);
	assert_close!(p[1],0.6,TOL);
	assert_close!(p[2],0.8,TOL);
    }

    #[test]
    fn test_seeded_scenario() {
	let mut rng = Random::seeded(42);
	let p = point_on_sphere(&mut rng);
	assert_close!(p.norm2(),1.0,TOL);
	let q = point_inside_sphere(&mut rng);
	assert!(q.norm2() <= 1.0);
    }

    #[test]
    fn test_determinism() {
	let mut a = Random::seeded(2024);
	let mut b = Random::seeded(2024);
	for _ in 0..1000 {
	    assert_eq!(point_on_sphere(&mut a),point_on_sphere(&mut b));
	    assert_eq!(point_inside_sphere(&mut a),point_inside_sphere(&mut b));
	}
    }

    #[test]
    fn test_no_nan() {
	for _ in 0..100000 {
	    let (x,y,z) = random_point_on_sphere();
	    assert!(x.is_finite() && y.is_finite() && z.is_finite());
	    let (x,y,z) = random_point_inside_sphere();
	    assert!(x.is_finite() && y.is_finite() && z.is_finite());
	}
    }

    #[test]
    fn test_z_marginal_uniform() {
	// Quarter-width bins of [-1,1] each hold a quarter of the points
	let mut rng = Random::seeded(3);
	let n : usize = 40000;
	let mut bins = [0_usize;4];
	for _ in 0..n {
	    let p = point_on_sphere(&mut rng);
	    let k = (((p[2] + 1.0)*2.0).floor() as usize).min(3);
	    bins[k] += 1;
	}
	for &b in bins.iter() {
	    assert!(abs(real(b)/real(n) - 0.25) < 0.015,"bins {:?}",bins);
	}
    }

    #[test]
    fn test_radius_cdf() {
	let mut rng = Random::seeded(4);
	let n : usize = 40000;
	let radii : Vec<Real> = (0..n).map(|_| point_inside_sphere(&mut rng).norm2()).collect();
	for &t in [0.25,0.5,0.75,0.9].iter() {
	    let f = real(radii.iter().filter(|&&r| r <= t).count())/real(n);
	    assert!(abs(f - cube(t)) < 0.015,"P(r <= {}) = {}",t,f);
	}
    }

    #[test]
    fn test_sphere_shift_scale() {
	let sphere = Sphere::new(r3(1.0,-1.0,2.0),2.0).unwrap();
	let mut rng = Random::seeded(5);
	for _ in 0..1000 {
	    let p = sphere.on_surface(&mut rng);
	    assert_close!((p - sphere.center).norm2sq(),4.0,TOL);
	    let q = sphere.inside(&mut rng);
	    assert!((q - sphere.center).norm2sq() <= 4.0 + TOL);
	    assert!(sphere.normalize(q).norm2() <= 1.0 + TOL);
	}
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
	assert!(Sphere::new(Real3::zero(),0.0).is_err());
	assert!(Sphere::new(Real3::zero(),-1.0).is_err());
	assert!(Sphere::new(Real3::zero(),std::f64::NAN).is_err());
	assert!(Sphere::new(r3(std::f64::INFINITY,0.0,0.0),1.0).is_err());
    }

    #[test]
    fn test_parse_options() {
	assert_eq!("volume".parse::<Mode>().unwrap(),Mode::Volume);
	assert_eq!("archimedes".parse::<Direction>().unwrap(),Direction::Archimedes);
	assert!("cube".parse::<Mode>().is_err());
    }
}
