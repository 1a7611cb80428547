use std::time::Instant;
use log::info;

use crate::math::*;

pub struct ProgressIndicator {
    total: usize,
    current: usize,
    last: usize,
    rate: Real,
    t_first: Instant,
    t_prev: Real,
    delta_t: Real,
    label: String
}

impl ProgressIndicator {
    pub fn new(lbl:&str,total:usize)->Self {
        ProgressIndicator {
            total,
            current: 0,
            last: 0,
            rate: 0.0,
            t_first: Instant::now(),
            t_prev: 0.0,
            delta_t: 0.5,
            label: lbl.to_string()
        }
    }

    fn elapsed(&self)->Real {
	self.t_first.elapsed().as_secs_f64()
    }

    /// Returns true when a line was logged.
    pub fn update(&mut self,current:usize)->bool {
        self.current = current;
        if real(current) >= real(self.last) + self.rate*self.delta_t {
            let t = self.elapsed();
            if t > self.t_prev + self.delta_t {
                let new_rate = real(current - self.last) / (t - self.t_prev);
                self.last = current;
                self.rate = max(1.0, (2.0*self.rate + new_rate)/3.0);
                self.t_prev = t;
                self.display();
		return true;
            }
        }
	false
    }

    pub fn eta(&self)->Real {
	let elp = self.elapsed();
	if self.current == 0 {
	    return INFINITY;
	}
	real(self.total.saturating_sub(self.current)) / (real(self.current)/elp)
    }

    pub fn display(&self) {
        let elp = self.elapsed();
        let eta = self.eta();
        info!("{:20} {:12} {:6.2}% elp {:8.1} ETA {:8.1} est {:8.1}",
              self.label, self.current, 100.0*real(self.current)/real(self.total.max(1)),
              elp, eta, elp+eta);
    }
}

const INFINITY:f64 = std::f64::INFINITY;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttled() {
	let mut p = ProgressIndicator::new("test",1000);
	// Nothing is logged before delta_t has elapsed
	assert!(!p.update(10));
	assert!(!p.update(20));
	assert!(p.eta().is_finite());
	let q = ProgressIndicator::new("idle",10);
	assert!(q.eta().is_infinite());
    }
}
