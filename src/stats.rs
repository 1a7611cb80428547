use std::fmt::{Display,Formatter};
use ndarray_stats::QuantileExt;

use crate::common::*;
use crate::math::*;
use crate::spherical::{Mode,Sphere};

/// Largest radius deviation tolerated regardless of the statistical tolerance.
pub const RADIUS_TOLERANCE:Real = 1e-9;

/// Height of the caps x > 1/2, y > 1/2, z > 1/2 of the unit sphere.
const CAP_HEIGHT:Real = 0.5;

/// Fractions may stray this many binomial standard deviations.
const FRACTION_SIGMAS:Real = 5.0;

/// Scaled KS bound; P(sqrt(n) D > 2.3) is about 1e-4.
const KS_COEFFICIENT:Real = 2.3;

/// Bound on |observed - expected| for a fraction over n points.
pub fn fraction_bound(expected:Real,n:usize,tolerance:Real)->Real {
    let sigma = sqrt(expected*(1.0 - expected)/real(n.max(1)));
    max(tolerance,FRACTION_SIGMAS*sigma)
}

/// Bound on the KS distance over n points.
pub fn ks_bound(n:usize,tolerance:Real)->Real {
    max(tolerance,KS_COEFFICIENT/sqrt(real(n.max(1))))
}

#[derive(Clone,Debug)]
pub struct Report {
    pub mode:Mode,
    pub count:usize,
    pub radius_error:Real,
    pub cap_fractions:[Real;3],
    pub expected_cap_fraction:Real,
    pub inner_fraction:Real,
    pub expected_inner_fraction:Real,
    pub ks:Real
}

/// Fraction of a sphere (surface or volume) lying in a cap of height h.
pub fn cap_fraction(mode:Mode,h:Real)->Real {
    match mode {
	// Archimedes: area of a zone only depends on its height
	Mode::Surface => h/2.0,
	// Cap volume pi h^2 (3 - h)/3 over 4 pi/3
	Mode::Volume => sq(h)*(3.0 - h)/4.0
    }
}

/// Kolmogorov-Smirnov distance between the sample and the CDF f.
pub fn ks_distance<F:Fn(Real)->Real>(mut values:Vec<Real>,f:F)->Real {
    let n = values.len();
    if n == 0 {
	return 0.0;
    }
    values.sort_by(|a,b| a.total_cmp(b));
    let m = real(n);
    let mut d : Real = 0.0;
    for (i,&x) in values.iter().enumerate() {
	let fx = f(x);
	d = max(d,real(i + 1)/m - fx);
	d = max(d,fx - real(i)/m);
    }
    d
}

impl Report {
    /// Points are the rows of an n x 3 array.
    pub fn compute(points:ArrayView2<Real>,sphere:&Sphere,mode:Mode)->Res<Self> {
	let (n,d) = points.dim();
	if d != 3 {
	    return Err(error(&format!("Expected 3 columns, got {}",d)));
	}
	if n == 0 {
	    return Err(error("No points to check"));
	}
	let unit : Vec<Real3> = points
	    .axis_iter(Axis(0))
	    .map(|row| sphere.normalize(r3(row[0],row[1],row[2])))
	    .collect();
	let radii : Array1<Real> = unit.iter().map(|p| p.norm2()).collect();

	let deviations = match mode {
	    Mode::Surface => radii.mapv(|r| abs(r - 1.0)),
	    Mode::Volume => radii.mapv(|r| max(r - 1.0,0.0))
	};
	let radius_error = *deviations.max()?;

	let mut cap_fractions = [0.0;3];
	for (k,c) in cap_fractions.iter_mut().enumerate() {
	    let m = unit.iter().filter(|p| p[k] > 1.0 - CAP_HEIGHT).count();
	    *c = real(m)/real(n);
	}

	let inner = radii.iter().filter(|&&r| r < 0.5).count();
	let inner_fraction = real(inner)/real(n);

	let ks = match mode {
	    Mode::Surface => ks_distance(unit.iter().map(|p| p[2]).collect(),
					 |z| min(max((z + 1.0)/2.0,0.0),1.0)),
	    Mode::Volume => ks_distance(radii.to_vec(),
					|r| cube(min(max(r,0.0),1.0)))
	};

	Ok(Self {
	    mode,
	    count:n,
	    radius_error,
	    cap_fractions,
	    expected_cap_fraction:cap_fraction(mode,CAP_HEIGHT),
	    inner_fraction,
	    expected_inner_fraction:match mode {
		Mode::Surface => 0.0,
		Mode::Volume => cube(0.5)
	    },
	    ks
	})
    }

    /// The tolerance is widened to the sampling noise expected for `count` points.
    pub fn verify(&self,tolerance:Real)->Res<()> {
	if self.radius_error > RADIUS_TOLERANCE {
	    return Err(error(&format!("Radius error {:.3e} exceeds {:.3e}",
				      self.radius_error,RADIUS_TOLERANCE)));
	}
	let n = self.count;
	let cap_tol = fraction_bound(self.expected_cap_fraction,n,tolerance);
	for (k,&c) in self.cap_fractions.iter().enumerate() {
	    if abs(c - self.expected_cap_fraction) > cap_tol {
		return Err(error(&format!("Cap fraction along axis {} is {:.4}, expected {:.4} +/- {:.4}",
					  k,c,self.expected_cap_fraction,cap_tol)));
	    }
	}
	let inner_tol = fraction_bound(self.expected_inner_fraction,n,tolerance);
	if abs(self.inner_fraction - self.expected_inner_fraction) > inner_tol {
	    return Err(error(&format!("Inner fraction is {:.4}, expected {:.4} +/- {:.4}",
				      self.inner_fraction,self.expected_inner_fraction,inner_tol)));
	}
	let ks_tol = ks_bound(n,tolerance);
	if self.ks > ks_tol {
	    return Err(error(&format!("KS distance {:.4} exceeds {:.4}",self.ks,ks_tol)));
	}
	Ok(())
    }
}

impl Display for Report {
    fn fmt(&self,fmt:&mut Formatter)->Result<(),std::fmt::Error> {
	write!(fmt,
	       "{:?} n={} radius_err={:.3e} caps=[{:.4},{:.4},{:.4}] (exp {:.4}) \
		inner={:.4} (exp {:.4}) ks={:.4}",
	       self.mode,
	       self.count,
	       self.radius_error,
	       self.cap_fractions[0],
	       self.cap_fractions[1],
	       self.cap_fractions[2],
	       self.expected_cap_fraction,
	       self.inner_fraction,
	       self.expected_inner_fraction,
	       self.ks)
    }
}
